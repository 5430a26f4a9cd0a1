//! Book create/edit payloads.
//!
//! Forms hand over raw text. [`BookDraft::to_payload`] is the one place that
//! turns it into a request body: blank optional fields are dropped, numeric
//! fields are parsed with an explicit error instead of being coerced.

use std::fmt;

use chrono::Datelike;
use libris_types::BookDetail;
use serde::Serialize;

const MIN_PUBLISHED_YEAR: i32 = 1000;

/// Raw form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    pub category: String,
    pub published_year: String,
    pub publisher: String,
    pub pages: String,
    pub language: String,
    pub cover_image: String,
    pub quantity: String,
    pub available: bool,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            isbn: String::new(),
            description: String::new(),
            category: String::new(),
            published_year: String::new(),
            publisher: String::new(),
            pages: String::new(),
            language: "English".to_string(),
            cover_image: String::new(),
            quantity: "1".to_string(),
            available: true,
        }
    }
}

/// Serialized request body for `POST /books` and `PUT /books/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    MissingField(&'static str),
    InvalidNumber { field: &'static str, value: String },
    OutOfRange { field: &'static str, value: i64, min: i64, max: i64 },
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::MissingField(field) => write!(f, "{field} is required"),
            DraftError::InvalidNumber { field, value } => {
                write!(f, "{field} must be a whole number (got {value:?})")
            }
            DraftError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be between {min} and {max} (got {value})"),
        }
    }
}

impl std::error::Error for DraftError {}

impl BookDraft {
    /// Prefills the edit form from an existing record.
    pub fn from_detail(detail: &BookDetail) -> Self {
        let summary = &detail.summary;
        Self {
            title: summary.title.clone(),
            author: summary.author.clone(),
            isbn: detail.isbn.clone(),
            description: detail.description.clone().unwrap_or_default(),
            category: summary.category.clone(),
            published_year: summary
                .published_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            publisher: detail.publisher.clone().unwrap_or_default(),
            pages: detail.pages.map(|p| p.to_string()).unwrap_or_default(),
            language: detail.language.clone().unwrap_or_default(),
            cover_image: summary.cover_image.clone().unwrap_or_default(),
            quantity: summary.quantity.to_string(),
            available: summary.available,
        }
    }

    /// Validates against the current calendar year.
    ///
    /// # Errors
    /// See [`Self::to_payload_for_year`].
    pub fn to_payload(&self) -> Result<BookPayload, DraftError> {
        self.to_payload_for_year(chrono::Local::now().year())
    }

    /// Builds the request body.
    ///
    /// # Errors
    /// `MissingField` for a blank title/author/isbn/category, `InvalidNumber`
    /// for non-numeric numeric fields, `OutOfRange` for a published year
    /// outside `1000..=current_year` or zero pages.
    pub fn to_payload_for_year(&self, current_year: i32) -> Result<BookPayload, DraftError> {
        let published_year = parse_number::<i32>("publishedYear", &self.published_year)?;
        if let Some(year) = published_year
            && !(MIN_PUBLISHED_YEAR..=current_year).contains(&year)
        {
            return Err(DraftError::OutOfRange {
                field: "publishedYear",
                value: i64::from(year),
                min: i64::from(MIN_PUBLISHED_YEAR),
                max: i64::from(current_year),
            });
        }

        let pages = parse_number::<u32>("pages", &self.pages)?;
        if pages == Some(0) {
            return Err(DraftError::OutOfRange {
                field: "pages",
                value: 0,
                min: 1,
                max: i64::from(u32::MAX),
            });
        }

        Ok(BookPayload {
            title: required("title", &self.title)?,
            author: required("author", &self.author)?,
            isbn: required("isbn", &self.isbn)?,
            category: required("category", &self.category)?,
            description: optional(&self.description),
            published_year,
            publisher: optional(&self.publisher),
            pages,
            language: optional(&self.language),
            cover_image: optional(&self.cover_image),
            quantity: parse_number::<u32>("quantity", &self.quantity)?,
            available: self.available,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, DraftError> {
    optional(value).ok_or(DraftError::MissingField(field))
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<Option<T>, DraftError> {
    let Some(text) = optional(value) else {
        return Ok(None);
    };
    text.parse::<T>()
        .map(Some)
        .map_err(|_| DraftError::InvalidNumber { field, value: text })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn filled() -> BookDraft {
        BookDraft {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "978-0441013593".to_string(),
            category: "Fiction".to_string(),
            ..BookDraft::default()
        }
    }

    #[test]
    fn test_blank_optional_fields_are_omitted() {
        let payload = filled().to_payload_for_year(2026).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Dune",
                "author": "Frank Herbert",
                "isbn": "978-0441013593",
                "category": "Fiction",
                "language": "English",
                "quantity": 1,
                "available": true
            })
        );
    }

    #[test]
    fn test_numeric_fields_parsed() {
        let draft = BookDraft {
            published_year: "1965".to_string(),
            pages: " 412 ".to_string(),
            quantity: "3".to_string(),
            ..filled()
        };
        let payload = draft.to_payload_for_year(2026).unwrap();
        assert_eq!(payload.published_year, Some(1965));
        assert_eq!(payload.pages, Some(412));
        assert_eq!(payload.quantity, Some(3));
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let draft = BookDraft {
            pages: "four hundred".to_string(),
            ..filled()
        };
        assert_eq!(
            draft.to_payload_for_year(2026),
            Err(DraftError::InvalidNumber {
                field: "pages",
                value: "four hundred".to_string()
            })
        );
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let draft = BookDraft {
            quantity: "-1".to_string(),
            ..filled()
        };
        assert!(matches!(
            draft.to_payload_for_year(2026),
            Err(DraftError::InvalidNumber {
                field: "quantity",
                ..
            })
        ));
    }

    #[test]
    fn test_future_year_rejected() {
        let draft = BookDraft {
            published_year: "2031".to_string(),
            ..filled()
        };
        assert!(matches!(
            draft.to_payload_for_year(2026),
            Err(DraftError::OutOfRange {
                field: "publishedYear",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_required_field() {
        let draft = BookDraft {
            isbn: "   ".to_string(),
            ..filled()
        };
        assert_eq!(
            draft.to_payload_for_year(2026),
            Err(DraftError::MissingField("isbn"))
        );
    }

    #[test]
    fn test_edit_form_prefill_roundtrips() {
        let detail: BookDetail = serde_json::from_value(json!({
            "_id": "b1", "title": "Emma", "author": "Austen", "category": "Fiction",
            "quantity": 2, "available": false, "isbn": "978-1", "pages": 320,
            "publishedYear": 1815
        }))
        .unwrap();

        let payload = BookDraft::from_detail(&detail)
            .to_payload_for_year(2026)
            .unwrap();
        assert_eq!(payload.published_year, Some(1815));
        assert_eq!(payload.pages, Some(320));
        assert_eq!(payload.quantity, Some(2));
        assert!(!payload.available);
        assert_eq!(payload.language, None);
    }
}
