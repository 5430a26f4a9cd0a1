//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs
//! either directly.

use libris_core::catalog::CatalogRequest;
use libris_core::credential::Credential;
use libris_core::draft::BookPayload;
use libris_core::session::{LoginCredentials, RegistrationProfile};
use libris_types::RequestEpoch;

#[derive(Debug)]
pub enum UiEffect {
    FetchCatalog(CatalogRequest),
    FetchCategories,
    /// Unfiltered first page used for owner aggregation.
    FetchDashboard { epoch: RequestEpoch, limit: u32 },
    FetchBook { epoch: RequestEpoch, id: String },
    DeleteBook { id: String },
    /// Create when `id` is `None`, otherwise update.
    SaveBook {
        id: Option<String>,
        payload: BookPayload,
    },
    Login(LoginCredentials),
    Register(RegistrationProfile),
    Logout,
    /// The service rejected `sent_with`; end the session if it still owns
    /// that credential.
    ExpireSession { sent_with: Option<Credential> },
}
