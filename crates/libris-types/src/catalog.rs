//! Catalog query and page types.

use serde::{Deserialize, Serialize};

use crate::book::BookSummary;

/// Monotonic request counter used to detect superseded fetch responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestEpoch(pub u64);

impl RequestEpoch {
    #[must_use]
    pub fn next(self) -> Self {
        RequestEpoch(self.0.wrapping_add(1))
    }
}

/// Current search / filter / page selection.
///
/// Changing the search term or the category filter always resets the page to
/// 1; changing the page leaves both filters untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    search_term: String,
    category_filter: Option<String>,
    page: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category_filter: None,
            page: 1,
        }
    }
}

impl CatalogQuery {
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category_filter(&self) -> Option<&str> {
        self.category_filter.as_deref()
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into().trim().to_string();
        self.page = 1;
    }

    /// Sets the category filter. An empty string clears it ("All Categories").
    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.category_filter = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self.page = 1;
    }

    /// Sets the page. Values below 1 are raised to 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Serializes the query as request parameters.
    ///
    /// `search` and `category` are omitted when empty.
    pub fn to_params(&self, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", limit.to_string())];
        if !self.search_term.is_empty() {
            params.push(("search", self.search_term.clone()));
        }
        if let Some(category) = &self.category_filter {
            params.push(("category", category.clone()));
        }
        params
    }
}

/// One authoritative page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<BookSummary>,
    /// Always at least 1, even for an empty result.
    pub total_pages: u32,
    pub request_epoch: RequestEpoch,
}

/// Wire shape of `GET /books`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogListResponse {
    pub data: Vec<BookSummary>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

impl CatalogListResponse {
    pub fn into_page(self, request_epoch: RequestEpoch) -> CatalogPage {
        CatalogPage {
            items: self.data,
            total_pages: self.total_pages.max(1),
            request_epoch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_changes_reset_page() {
        let mut query = CatalogQuery::default();
        query.set_page(3);
        query.set_search_term("dune");
        assert_eq!(query.page(), 1);

        query.set_page(2);
        query.set_category_filter(Some("Fiction".to_string()));
        assert_eq!(query.page(), 1);
        assert_eq!(query.search_term(), "dune");
    }

    #[test]
    fn test_page_change_keeps_filters() {
        let mut query = CatalogQuery::default();
        query.set_category_filter(Some("Fiction".to_string()));
        query.set_page(3);
        assert_eq!(query.category_filter(), Some("Fiction"));
        assert_eq!(query.page(), 3);
    }

    #[test]
    fn test_empty_category_clears_filter() {
        let mut query = CatalogQuery::default();
        query.set_category_filter(Some("  ".to_string()));
        assert_eq!(query.category_filter(), None);
    }

    #[test]
    fn test_params_omit_empty_fields() {
        let query = CatalogQuery::default();
        assert_eq!(
            query.to_params(12),
            vec![("page", "1".to_string()), ("limit", "12".to_string())]
        );
    }

    #[test]
    fn test_params_include_search_and_category() {
        let mut query = CatalogQuery::default();
        query.set_search_term("  tolkien ");
        query.set_category_filter(Some("Fantasy".to_string()));
        let params = query.to_params(12);
        assert!(params.contains(&("search", "tolkien".to_string())));
        assert!(params.contains(&("category", "Fantasy".to_string())));
    }

    #[test]
    fn test_zero_total_pages_clamped() {
        let response = CatalogListResponse {
            data: Vec::new(),
            total_pages: 0,
        };
        assert_eq!(response.into_page(RequestEpoch(4)).total_pages, 1);
    }
}
