//! Catalog query engine.
//!
//! Reconciles search term, category filter and page number into one
//! authoritative [`CatalogPage`] at a time.
//!
//! The engine performs no I/O. Every query change returns a
//! [`CatalogRequest`] stamped with a fresh [`RequestEpoch`]; the caller
//! executes it (see [`crate::books::fetch_page`]) and hands the result back to
//! [`CatalogEngine::on_response`]. Only the response whose epoch matches the
//! most recently issued request is applied; anything older is dropped, in
//! whatever order responses arrive. In-flight requests are never cancelled,
//! only neutralised.

use std::fmt;

use libris_types::{CatalogPage, CatalogQuery, RequestEpoch};
use tracing::debug;

use crate::api::{ApiError, ApiResult};

/// A fetch the caller must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub epoch: RequestEpoch,
    pub query: CatalogQuery,
    pub limit: u32,
}

impl CatalogRequest {
    /// Query-string parameters for `GET /books`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        self.query.to_params(self.limit)
    }
}

/// Requested page lies outside `1..=total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutOfRange {
    pub requested: u32,
    pub total_pages: u32,
}

impl fmt::Display for PageOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} is outside 1..={}",
            self.requested, self.total_pages
        )
    }
}

impl std::error::Error for PageOutOfRange {}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Newest request succeeded; the page was replaced.
    Applied,
    /// Newest request failed; the previous page stays, error flag set.
    Failed,
    /// A newer request has been issued since; result discarded.
    Stale,
}

/// Catalog state for list views.
#[derive(Debug)]
pub struct CatalogEngine {
    query: CatalogQuery,
    page_size: u32,
    current: Option<CatalogPage>,
    latest: RequestEpoch,
    loading: bool,
    error: Option<ApiError>,
}

impl CatalogEngine {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: CatalogQuery::default(),
            page_size: page_size.max(1),
            current: None,
            latest: RequestEpoch::default(),
            loading: false,
            error: None,
        }
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Last authoritative page, if any fetch has succeeded.
    pub fn page(&self) -> Option<&CatalogPage> {
        self.current.as_ref()
    }

    pub fn items(&self) -> &[libris_types::BookSummary] {
        self.current.as_ref().map_or(&[], |page| page.items.as_slice())
    }

    /// Total pages of the last known page; 1 before the first success.
    pub fn total_pages(&self) -> u32 {
        self.current.as_ref().map_or(1, |page| page.total_pages)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Epoch of the most recently issued request.
    pub fn latest_epoch(&self) -> RequestEpoch {
        self.latest
    }

    /// Replaces the search term, resets to page 1 and refetches.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> CatalogRequest {
        self.query.set_search_term(term);
        self.refetch()
    }

    /// Replaces the category filter (`None` = all), resets to page 1 and
    /// refetches.
    pub fn set_category_filter(&mut self, category: Option<String>) -> CatalogRequest {
        self.query.set_category_filter(category);
        self.refetch()
    }

    /// Moves to page `page` and refetches. Filters are left untouched.
    ///
    /// # Errors
    /// Returns [`PageOutOfRange`] unless `1 <= page <= total_pages()`; the
    /// query is not modified in that case.
    pub fn set_page(&mut self, page: u32) -> Result<CatalogRequest, PageOutOfRange> {
        let total_pages = self.total_pages();
        if page == 0 || page > total_pages {
            return Err(PageOutOfRange {
                requested: page,
                total_pages,
            });
        }
        self.query.set_page(page);
        Ok(self.refetch())
    }

    /// "Next" button: `None` on the last page.
    pub fn next_page(&mut self) -> Option<CatalogRequest> {
        self.set_page(self.query.page().saturating_add(1)).ok()
    }

    /// "Previous" button: `None` on the first page.
    pub fn prev_page(&mut self) -> Option<CatalogRequest> {
        self.set_page(self.query.page().saturating_sub(1)).ok()
    }

    /// Issues a new request for the current query.
    ///
    /// Every earlier in-flight request becomes stale.
    pub fn refetch(&mut self) -> CatalogRequest {
        self.latest = self.latest.next();
        self.loading = true;
        debug!(epoch = self.latest.0, page = self.query.page(), "catalog fetch issued");
        CatalogRequest {
            epoch: self.latest,
            query: self.query.clone(),
            limit: self.page_size,
        }
    }

    /// Applies a completed fetch if it belongs to the newest request.
    pub fn on_response(
        &mut self,
        epoch: RequestEpoch,
        result: ApiResult<CatalogPage>,
    ) -> FetchOutcome {
        if epoch != self.latest {
            debug!(
                epoch = epoch.0,
                latest = self.latest.0,
                "discarding stale catalog response"
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(mut page) => {
                page.request_epoch = epoch;
                self.current = Some(page);
                self.error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                debug!(kind = %e.kind, "catalog fetch failed; keeping previous page");
                self.error = Some(e);
                FetchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use libris_types::BookSummary;

    use super::*;
    use crate::api::ApiErrorKind;

    fn book(id: &str) -> BookSummary {
        BookSummary {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: "Author".to_string(),
            category: "Fiction".to_string(),
            cover_image: None,
            published_year: None,
            quantity: 1,
            available: true,
            owner: None,
        }
    }

    fn page(ids: &[&str], total_pages: u32) -> CatalogPage {
        CatalogPage {
            items: ids.iter().map(|id| book(id)).collect(),
            total_pages,
            request_epoch: RequestEpoch::default(),
        }
    }

    #[test]
    fn test_filter_setters_reset_page() {
        let mut engine = CatalogEngine::new(12);
        let first = engine.refetch();
        engine.on_response(first.epoch, Ok(page(&["a"], 5)));

        let request = engine.set_page(4).unwrap();
        assert_eq!(request.query.page(), 4);

        let request = engine.set_search_term("dune");
        assert_eq!(request.query.page(), 1);
        assert_eq!(engine.query().page(), 1);

        engine.on_response(request.epoch, Ok(page(&["a"], 5)));
        engine.set_page(3).unwrap();
        let request = engine.set_category_filter(Some("Fiction".to_string()));
        assert_eq!(request.query.page(), 1);
    }

    #[test]
    fn test_late_older_response_is_discarded() {
        let mut engine = CatalogEngine::new(12);
        let a = engine.set_category_filter(Some("Fiction".to_string()));
        let b = engine.set_category_filter(Some("History".to_string()));

        assert_eq!(engine.on_response(b.epoch, Ok(page(&["b"], 1))), FetchOutcome::Applied);
        assert_eq!(engine.on_response(a.epoch, Ok(page(&["a"], 1))), FetchOutcome::Stale);

        assert_eq!(engine.items()[0].id, "b");
        assert_eq!(engine.page().unwrap().request_epoch, b.epoch);
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_early_older_response_is_discarded() {
        let mut engine = CatalogEngine::new(12);
        let a = engine.set_search_term("a");
        let b = engine.set_search_term("b");

        assert_eq!(engine.on_response(a.epoch, Ok(page(&["a"], 1))), FetchOutcome::Stale);
        assert!(engine.page().is_none());
        assert!(engine.is_loading());

        assert_eq!(engine.on_response(b.epoch, Ok(page(&["b"], 1))), FetchOutcome::Applied);
        assert_eq!(engine.items()[0].id, "b");
    }

    #[test]
    fn test_failure_keeps_previous_page() {
        let mut engine = CatalogEngine::new(12);
        let first = engine.refetch();
        engine.on_response(first.epoch, Ok(page(&["a", "b"], 2)));

        let second = engine.next_page().unwrap();
        let outcome = engine.on_response(
            second.epoch,
            Err(ApiError::network("connection reset")),
        );

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(engine.items().len(), 2);
        assert_eq!(
            engine.error().map(|e| e.kind),
            Some(ApiErrorKind::NetworkFailure)
        );
        assert!(!engine.is_loading());

        let retry = engine.refetch();
        engine.on_response(retry.epoch, Ok(page(&["c"], 2)));
        assert!(engine.error().is_none());
    }

    #[test]
    fn test_stale_failure_does_not_set_error() {
        let mut engine = CatalogEngine::new(12);
        let a = engine.refetch();
        let _b = engine.refetch();
        let outcome = engine.on_response(a.epoch, Err(ApiError::network("boom")));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(engine.error().is_none());
    }

    #[test]
    fn test_set_page_rejects_out_of_range() {
        let mut engine = CatalogEngine::new(12);
        let first = engine.refetch();
        engine.on_response(first.epoch, Ok(page(&["a"], 3)));

        assert_eq!(
            engine.set_page(0),
            Err(PageOutOfRange {
                requested: 0,
                total_pages: 3
            })
        );
        assert!(engine.set_page(4).is_err());
        assert_eq!(engine.query().page(), 1);
        assert!(engine.set_page(3).is_ok());
    }

    #[test]
    fn test_prev_next_clamp() {
        let mut engine = CatalogEngine::new(12);
        assert!(engine.prev_page().is_none());
        assert!(engine.next_page().is_none());

        let first = engine.refetch();
        engine.on_response(first.epoch, Ok(page(&["a"], 2)));
        assert_eq!(engine.next_page().map(|r| r.query.page()), Some(2));
        assert!(engine.next_page().is_none());
        assert_eq!(engine.prev_page().map(|r| r.query.page()), Some(1));
    }

    #[test]
    fn test_request_params_use_page_size() {
        let mut engine = CatalogEngine::new(12);
        let request = engine.set_category_filter(Some("Fiction".to_string()));
        assert_eq!(
            request.params(),
            vec![
                ("page", "1".to_string()),
                ("limit", "12".to_string()),
                ("category", "Fiction".to_string()),
            ]
        );
    }

    #[test]
    fn test_epochs_increase_monotonically() {
        let mut engine = CatalogEngine::new(12);
        let a = engine.refetch();
        let b = engine.set_search_term("x");
        let c = engine.set_category_filter(None);
        assert!(a.epoch < b.epoch && b.epoch < c.epoch);
        assert_eq!(engine.latest_epoch(), c.epoch);
    }
}
