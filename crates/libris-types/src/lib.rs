//! Shared data model for the libris catalog client.
//!
//! Pure types only: no I/O, no async. Everything the remote service sends or
//! receives is modelled here so the core and the client shell agree on shape.

pub mod book;
pub mod catalog;
pub mod identity;
pub mod session;

pub use book::{BookDetail, BookOwner, BookSummary};
pub use catalog::{CatalogPage, CatalogQuery, RequestEpoch};
pub use identity::{Identity, Role};
pub use session::SessionState;

/// Generic `{ "data": .. }` envelope used by single-item endpoints.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}
