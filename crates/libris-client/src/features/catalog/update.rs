//! Catalog reducer.

use libris_core::api::ApiResult;
use libris_core::catalog::{CatalogRequest, FetchOutcome};
use libris_types::{CatalogPage, RequestEpoch};
use tracing::debug;

use super::CatalogState;
use crate::effects::UiEffect;
use crate::update::expire_if_unauthorized;

fn fetch(request: CatalogRequest) -> Vec<UiEffect> {
    vec![UiEffect::FetchCatalog(request)]
}

/// Loads issued when the catalog page opens.
pub fn on_enter(catalog: &mut CatalogState) -> Vec<UiEffect> {
    let mut effects = fetch(catalog.engine.refetch());
    if !catalog.categories_loaded {
        effects.push(UiEffect::FetchCategories);
    }
    effects
}

pub fn handle_search(catalog: &mut CatalogState, term: String) -> Vec<UiEffect> {
    fetch(catalog.engine.set_search_term(term))
}

pub fn handle_category(catalog: &mut CatalogState, category: Option<String>) -> Vec<UiEffect> {
    fetch(catalog.engine.set_category_filter(category))
}

pub fn handle_page(catalog: &mut CatalogState, page: u32) -> Vec<UiEffect> {
    match catalog.engine.set_page(page) {
        Ok(request) => fetch(request),
        Err(e) => {
            debug!(error = %e, "ignoring page change");
            vec![]
        }
    }
}

pub fn handle_next(catalog: &mut CatalogState) -> Vec<UiEffect> {
    catalog.engine.next_page().map(fetch).unwrap_or_default()
}

pub fn handle_prev(catalog: &mut CatalogState) -> Vec<UiEffect> {
    catalog.engine.prev_page().map(fetch).unwrap_or_default()
}

pub fn handle_retry(catalog: &mut CatalogState) -> Vec<UiEffect> {
    fetch(catalog.engine.refetch())
}

pub fn handle_catalog_loaded(
    catalog: &mut CatalogState,
    epoch: RequestEpoch,
    result: ApiResult<CatalogPage>,
) -> Vec<UiEffect> {
    let expire = result.as_ref().err().and_then(expire_if_unauthorized);
    if catalog.engine.on_response(epoch, result) == FetchOutcome::Stale {
        debug!(epoch = epoch.0, "catalog response superseded");
        return vec![];
    }
    expire.into_iter().collect()
}

pub fn handle_categories_loaded(catalog: &mut CatalogState, categories: Vec<String>) -> Vec<UiEffect> {
    // An empty list may be a degraded fetch; ask again next time.
    catalog.categories_loaded = !categories.is_empty();
    catalog.categories = categories;
    vec![]
}
