//! Authenticated REST client for the Taste & Grow backend.
//!
//! This module provides the `ApiClient` request wrapper used by every
//! dashboard feature: JSON headers by default, bearer credential attachment,
//! and session teardown when the backend rejects the credential.

pub mod client;
pub mod error;
pub mod options;

pub use client::{ApiClient, ApiClientBuilder, SessionExpiredHandler, LOGIN_ROUTE};
pub use error::ApiError;
pub use options::RequestOptions;
