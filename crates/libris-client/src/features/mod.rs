//! Feature slices (state + reducer per slice).

pub mod book;
pub mod catalog;
pub mod dashboard;
pub mod session;
