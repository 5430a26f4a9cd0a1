//! Book detail, delete and form reducers.

use libris_core::api::{ApiErrorKind, ApiResult};
use libris_core::draft::BookDraft;
use libris_core::gate;
use libris_types::{BookDetail, RequestEpoch};
use tracing::debug;

use crate::effects::UiEffect;
use crate::route::Route;
use crate::state::{AppState, NoticeLevel};
use crate::update::{expire_if_unauthorized, navigate};

pub fn handle_book_loaded(
    app: &mut AppState,
    epoch: RequestEpoch,
    result: ApiResult<BookDetail>,
) -> Vec<UiEffect> {
    if !app.book.request.finish_if_active(epoch) {
        debug!(epoch = epoch.0, "book response superseded");
        return vec![];
    }
    app.book.loading = false;

    let detail = match result {
        Ok(detail) => detail,
        Err(e) if e.kind == ApiErrorKind::NotFound => {
            app.book.detail = None;
            app.notify(NoticeLevel::Error, "Book not found");
            return navigate(app, Route::Books);
        }
        Err(e) => {
            let expire = expire_if_unauthorized(&e);
            app.book.error = Some(e.message);
            return expire.into_iter().collect();
        }
    };

    if let Route::EditBook(id) = &app.route {
        if !gate::can_modify(app.session.identity(), &detail) {
            let id = id.clone();
            app.book.detail = Some(detail);
            app.notify(NoticeLevel::Error, "You can only edit your own books");
            app.route = Route::BookDetail(id);
            return vec![];
        }
        app.book.form.draft = BookDraft::from_detail(&detail);
    }
    app.book.detail = Some(detail);
    vec![]
}

pub fn handle_delete_requested(app: &mut AppState) -> Vec<UiEffect> {
    let Some(detail) = &app.book.detail else {
        return vec![];
    };
    if app.book.deleting {
        return vec![];
    }
    if !gate::can_modify(app.session.identity(), detail) {
        app.notify(
            NoticeLevel::Error,
            "You are not allowed to delete this book",
        );
        return vec![];
    }

    let id = detail.summary.id.clone();
    app.book.deleting = true;
    vec![UiEffect::DeleteBook { id }]
}

pub fn handle_book_deleted(app: &mut AppState, id: &str, result: ApiResult<()>) -> Vec<UiEffect> {
    app.book.deleting = false;
    match result {
        Ok(()) => {
            if app.book.detail.as_ref().is_some_and(|d| d.summary.id == id) {
                app.book.detail = None;
            }
            app.notify(NoticeLevel::Success, "Book deleted successfully");
            navigate(app, Route::Books)
        }
        Err(e) => {
            app.notify(NoticeLevel::Error, format!("Failed to delete book: {e}"));
            expire_if_unauthorized(&e).into_iter().collect()
        }
    }
}

pub fn handle_form_submitted(app: &mut AppState, draft: BookDraft) -> Vec<UiEffect> {
    if !app.session.is_authenticated() || app.book.form.saving {
        return vec![];
    }

    let form = &mut app.book.form;
    form.draft = draft;
    match form.draft.to_payload() {
        Ok(payload) => {
            form.error = None;
            form.saving = true;
            vec![UiEffect::SaveBook {
                id: form.editing.clone(),
                payload,
            }]
        }
        Err(e) => {
            form.error = Some(e.to_string());
            vec![]
        }
    }
}

pub fn handle_book_saved(
    app: &mut AppState,
    editing: Option<String>,
    result: ApiResult<BookDetail>,
) -> Vec<UiEffect> {
    app.book.form.saving = false;
    match (result, editing) {
        (Ok(_), None) => {
            app.notify(NoticeLevel::Success, "Book added successfully!");
            navigate(app, Route::Books)
        }
        (Ok(detail), Some(id)) => {
            app.book.detail = Some(detail);
            app.notify(NoticeLevel::Success, "Book updated successfully!");
            navigate(app, Route::BookDetail(id))
        }
        (Err(e), editing) => {
            let action = if editing.is_some() { "update" } else { "add" };
            app.notify(NoticeLevel::Error, format!("Failed to {action} book: {e}"));
            app.book.form.error = Some(e.message.clone());
            expire_if_unauthorized(&e).into_iter().collect()
        }
    }
}
