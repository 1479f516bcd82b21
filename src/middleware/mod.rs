//! Request extractors shared across route handlers.

pub mod auth;
