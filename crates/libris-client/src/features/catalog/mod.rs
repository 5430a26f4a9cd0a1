//! Catalog list page.

pub mod update;

use libris_core::catalog::CatalogEngine;

#[derive(Debug)]
pub struct CatalogState {
    pub engine: CatalogEngine,
    /// Category filter options; empty when the list could not be fetched.
    pub categories: Vec<String>,
    pub categories_loaded: bool,
}

impl CatalogState {
    pub fn new(page_size: u32) -> Self {
        Self {
            engine: CatalogEngine::new(page_size),
            categories: Vec::new(),
            categories_loaded: false,
        }
    }
}
