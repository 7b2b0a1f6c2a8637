//! Client library for the Taste & Grow admin dashboard.
//!
//! This crate provides the authenticated API layer the dashboard uses to talk
//! to the Taste & Grow backend: a [`SessionStore`] holding the bearer token
//! and user record, an [`ApiClient`] wrapping every request with JSON headers
//! and credential attachment, and per-verb convenience helpers.
//!
//! A 401 response on an authenticated call tears the session down: both
//! stored entries are cleared and a session-expired event is emitted so the
//! hosting application can route the operator back to the login view.

#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiClientBuilder, ApiError, RequestOptions, LOGIN_ROUTE};
pub use auth::SessionStore;
pub use config::{Config, DEFAULT_BASE_URL};
pub use models::AuthUser;
