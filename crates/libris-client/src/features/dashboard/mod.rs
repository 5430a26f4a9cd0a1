//! Owner dashboard.
//!
//! Only the raw unfiltered fetch is kept here; the owned-book view is
//! derived on demand (see [`crate::state::AppState::dashboard_summary`]) so
//! it always reflects the current session.

pub mod update;

use libris_core::api::ApiError;
use libris_types::BookSummary;

use crate::common::LatestOnly;
use crate::effects::UiEffect;

#[derive(Debug)]
pub struct DashboardState {
    pub items: Vec<BookSummary>,
    pub loading: bool,
    pub error: Option<ApiError>,
    /// Last fetch came back full; counts may be low.
    pub truncated: bool,
    limit: u32,
    request: LatestOnly,
}

impl DashboardState {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            truncated: false,
            limit: limit.max(1),
            request: LatestOnly::default(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Starts a fetch, superseding any in flight.
    pub fn begin(&mut self) -> UiEffect {
        self.loading = true;
        UiEffect::FetchDashboard {
            epoch: self.request.begin(),
            limit: self.limit,
        }
    }

    /// Drops fetched data and ignores any fetch still in flight.
    pub fn reset(&mut self) {
        self.request.cancel();
        self.items.clear();
        self.loading = false;
        self.error = None;
        self.truncated = false;
    }
}
