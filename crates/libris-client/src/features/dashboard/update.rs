//! Dashboard reducer.

use libris_core::api::ApiResult;
use libris_core::owner;
use libris_types::{BookSummary, RequestEpoch};
use tracing::debug;

use super::DashboardState;
use crate::effects::UiEffect;
use crate::update::expire_if_unauthorized;

pub fn handle_dashboard_loaded(
    dashboard: &mut DashboardState,
    epoch: RequestEpoch,
    result: ApiResult<Vec<BookSummary>>,
) -> Vec<UiEffect> {
    let expire = result.as_ref().err().and_then(expire_if_unauthorized);
    if !dashboard.request.finish_if_active(epoch) {
        debug!(epoch = epoch.0, "dashboard response superseded");
        return vec![];
    }

    dashboard.loading = false;
    match result {
        Ok(items) => {
            dashboard.truncated = owner::may_be_truncated(items.len(), dashboard.limit);
            dashboard.items = items;
            dashboard.error = None;
        }
        Err(e) => dashboard.error = Some(e),
    }
    expire.into_iter().collect()
}
