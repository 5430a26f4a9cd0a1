//! Effect handlers.
//!
//! Pure async functions: each performs one piece of I/O and returns the
//! `UiEvent` describing the outcome. Spawning is the runtime's job.

use std::sync::Arc;

use libris_core::api::ApiClient;
use libris_core::books;
use libris_core::catalog::CatalogRequest;
use libris_core::draft::BookPayload;
use libris_core::session::{LoginCredentials, RegistrationProfile, SessionManager};
use libris_types::RequestEpoch;

use crate::events::UiEvent;

pub async fn fetch_catalog(api: ApiClient, request: CatalogRequest) -> UiEvent {
    let result = books::fetch_page(&api, &request).await;
    UiEvent::CatalogLoaded {
        epoch: request.epoch,
        result,
    }
}

pub async fn fetch_categories(api: ApiClient) -> UiEvent {
    UiEvent::CategoriesLoaded(books::fetch_categories(&api).await)
}

pub async fn fetch_dashboard(api: ApiClient, epoch: RequestEpoch, limit: u32) -> UiEvent {
    let result = books::fetch_unfiltered(&api, limit).await;
    UiEvent::DashboardLoaded { epoch, result }
}

pub async fn fetch_book(api: ApiClient, epoch: RequestEpoch, id: String) -> UiEvent {
    let result = books::fetch_book(&api, &id).await;
    UiEvent::BookLoaded { epoch, result }
}

pub async fn delete_book(api: ApiClient, id: String) -> UiEvent {
    let result = books::delete_book(&api, &id).await;
    UiEvent::BookDeleted { id, result }
}

pub async fn save_book(api: ApiClient, id: Option<String>, payload: BookPayload) -> UiEvent {
    let result = match &id {
        Some(id) => books::update_book(&api, id, &payload).await,
        None => books::create_book(&api, &payload).await,
    };
    UiEvent::BookSaved {
        editing: id,
        result,
    }
}

pub async fn login(session: Arc<SessionManager>, credentials: LoginCredentials) -> UiEvent {
    UiEvent::LoginFinished(session.login(&credentials).await)
}

pub async fn register(session: Arc<SessionManager>, profile: RegistrationProfile) -> UiEvent {
    UiEvent::RegisterFinished(session.register(&profile).await)
}

pub async fn logout(session: Arc<SessionManager>) -> UiEvent {
    session.logout().await;
    UiEvent::LogoutFinished
}
