//! Core libris library (session, authorization, catalog state, API client).

pub mod api;
pub mod books;
pub mod catalog;
pub mod config;
pub mod credential;
pub mod draft;
pub mod gate;
pub mod logging;
pub mod owner;
pub mod session;

pub use libris_types as types;
