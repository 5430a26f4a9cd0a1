//! Book detail page and the add/edit form.

pub mod update;

use libris_core::draft::BookDraft;
use libris_types::BookDetail;

use crate::common::LatestOnly;
use crate::effects::UiEffect;

#[derive(Debug, Default)]
pub struct BookForm {
    pub draft: BookDraft,
    /// Id of the book being edited; `None` when adding.
    pub editing: Option<String>,
    pub saving: bool,
    pub error: Option<String>,
}

impl BookForm {
    /// Resets the form for adding (`None`) or editing a book.
    pub fn start(&mut self, editing: Option<String>) {
        *self = Self {
            editing,
            ..Self::default()
        };
    }
}

#[derive(Debug, Default)]
pub struct BookState {
    pub detail: Option<BookDetail>,
    pub loading: bool,
    pub error: Option<String>,
    pub deleting: bool,
    pub form: BookForm,
    request: LatestOnly,
}

impl BookState {
    /// Starts loading `id`, superseding any load in flight.
    pub fn load(&mut self, id: &str) -> UiEffect {
        if self.detail.as_ref().is_some_and(|d| d.summary.id != id) {
            self.detail = None;
        }
        self.loading = true;
        self.error = None;
        UiEffect::FetchBook {
            epoch: self.request.begin(),
            id: id.to_string(),
        }
    }

    /// Leaving the detail/edit pages: late results must not navigate.
    pub fn leave(&mut self) {
        self.request.cancel();
        self.loading = false;
    }
}
