//! UI event types.
//!
//! Everything the reducer reacts to: user intents from the embedder and
//! completions delivered through the runtime inbox.

use libris_core::api::ApiResult;
use libris_core::draft::BookDraft;
use libris_core::session::{LoginCredentials, RegistrationProfile, SessionError};
use libris_types::{BookDetail, BookSummary, CatalogPage, Identity, RequestEpoch, SessionState};

use crate::route::Route;

#[derive(Debug)]
pub enum UiEvent {
    Navigate(Route),
    SearchChanged(String),
    /// `None` selects every category.
    CategorySelected(Option<String>),
    PageRequested(u32),
    NextPage,
    PrevPage,
    RetryCatalog,
    LoginSubmitted(LoginCredentials),
    RegisterSubmitted(RegistrationProfile),
    LogoutRequested,
    /// Delete the book currently shown on the detail page.
    DeleteRequested,
    FormSubmitted(BookDraft),
    DismissNotice(usize),
    ClearNotices,

    SessionChanged(SessionState),
    CatalogLoaded {
        epoch: RequestEpoch,
        result: ApiResult<CatalogPage>,
    },
    CategoriesLoaded(Vec<String>),
    DashboardLoaded {
        epoch: RequestEpoch,
        result: ApiResult<Vec<BookSummary>>,
    },
    BookLoaded {
        epoch: RequestEpoch,
        result: ApiResult<BookDetail>,
    },
    BookDeleted {
        id: String,
        result: ApiResult<()>,
    },
    BookSaved {
        /// `None` for a newly created book.
        editing: Option<String>,
        result: ApiResult<BookDetail>,
    },
    LoginFinished(Result<Identity, SessionError>),
    RegisterFinished(Result<Identity, SessionError>),
    LogoutFinished,
}
