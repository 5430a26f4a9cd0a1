//! Catalog service endpoints.

use libris_types::catalog::CatalogListResponse;
use libris_types::{BookDetail, BookSummary, CatalogPage, DataEnvelope};
use tracing::warn;

use crate::api::{ApiClient, ApiResult};
use crate::catalog::CatalogRequest;
use crate::draft::BookPayload;

const BOOKS_PATH: &str = "/books";
const CATEGORIES_PATH: &str = "/books/categories";

fn book_path(id: &str) -> String {
    format!("{BOOKS_PATH}/{id}")
}

/// Executes a catalog request.
///
/// # Errors
/// Returns the classified API failure.
pub async fn fetch_page(api: &ApiClient, request: &CatalogRequest) -> ApiResult<CatalogPage> {
    let response: CatalogListResponse = api.get(BOOKS_PATH, &request.params()).await?;
    Ok(response.into_page(request.epoch))
}

/// Fetches the first `limit` entries, unfiltered.
///
/// # Errors
/// Returns the classified API failure.
pub async fn fetch_unfiltered(api: &ApiClient, limit: u32) -> ApiResult<Vec<BookSummary>> {
    let params = [("page", "1".to_string()), ("limit", limit.to_string())];
    let response: CatalogListResponse = api.get(BOOKS_PATH, &params).await?;
    Ok(response.data)
}

/// Category options for filters and forms.
///
/// Never fails: a failed refresh degrades to an empty option set.
pub async fn fetch_categories(api: &ApiClient) -> Vec<String> {
    match api.get::<DataEnvelope<Vec<String>>>(CATEGORIES_PATH, &[]).await {
        Ok(envelope) => envelope.data,
        Err(e) => {
            warn!(kind = %e.kind, error = %e, "category list unavailable");
            Vec::new()
        }
    }
}

/// # Errors
/// Returns the classified API failure (`NotFound` for unknown ids).
pub async fn fetch_book(api: &ApiClient, id: &str) -> ApiResult<BookDetail> {
    let envelope: DataEnvelope<BookDetail> = api.get(&book_path(id), &[]).await?;
    Ok(envelope.data)
}

/// # Errors
/// Returns the classified API failure (`ValidationFailed` carries the
/// service's message).
pub async fn create_book(api: &ApiClient, payload: &BookPayload) -> ApiResult<BookDetail> {
    let envelope: DataEnvelope<BookDetail> = api.post(BOOKS_PATH, payload).await?;
    Ok(envelope.data)
}

/// # Errors
/// Returns the classified API failure.
pub async fn update_book(
    api: &ApiClient,
    id: &str,
    payload: &BookPayload,
) -> ApiResult<BookDetail> {
    let envelope: DataEnvelope<BookDetail> = api.put(&book_path(id), payload).await?;
    Ok(envelope.data)
}

/// # Errors
/// Returns the classified API failure.
pub async fn delete_book(api: &ApiClient, id: &str) -> ApiResult<()> {
    api.delete(&book_path(id)).await
}
