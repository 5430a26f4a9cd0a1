//! Interactive client shell for the libris catalog.
//!
//! Elm-style: [`state::AppState`] is mutated only by [`update::update`], which
//! returns [`effects::UiEffect`]s for [`runtime::LibrisRuntime`] to execute.
//! Completions come back as [`events::UiEvent`]s through the runtime inbox.
//! Drawing is left to the embedder; [`state::AppState::view`] says what to
//! draw.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod route;
pub mod runtime;
pub mod state;
pub mod update;

pub use route::{Route, View};
pub use runtime::LibrisRuntime;
pub use state::{AppState, Notice, NoticeLevel};
