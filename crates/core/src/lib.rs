//! Domain logic for the Quill content API.
//!
//! This crate has no IO dependencies so it can be shared by the storage
//! layer, the HTTP server, and their tests.

pub mod comments;
pub mod edit_history;
pub mod error;
pub mod types;
pub mod validation;
