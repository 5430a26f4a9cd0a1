//! Book records as returned by the catalog service.

use serde::{Deserialize, Deserializer, Serialize};

/// Cover URL the service substitutes when no cover was supplied.
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/150x200?text=No+Cover";

/// Account that added a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOwner {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Read-only catalog entry consumed by list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub available: bool,
    #[serde(
        default,
        rename = "addedBy",
        alias = "owner",
        deserialize_with = "deserialize_owner",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner: Option<BookOwner>,
}

impl BookSummary {
    pub fn owner_id(&self) -> Option<&str> {
        self.owner.as_ref().map(|owner| owner.id.as_str())
    }

    /// Returns true when a real cover (not the service placeholder) is set.
    pub fn has_cover(&self) -> bool {
        self.cover_image
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty() && url != PLACEHOLDER_COVER)
    }
}

/// Full record for the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    #[serde(flatten)]
    pub summary: BookSummary,
    #[serde(default)]
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// `addedBy` arrives either populated (`{ _id, name }`) or as a bare id.
fn deserialize_owner<'de, D>(deserializer: D) -> Result<Option<BookOwner>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OwnerRef {
        Populated(BookOwner),
        Id(String),
    }

    Ok(
        Option::<OwnerRef>::deserialize(deserializer)?.map(|owner| match owner {
            OwnerRef::Populated(owner) => owner,
            OwnerRef::Id(id) => BookOwner { id, name: None },
        }),
    )
}
