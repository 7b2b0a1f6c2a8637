//! Session credential management.
//!
//! This module provides `SessionStore`, the single home for the persisted
//! bearer token and user record. The token is created on login, read on every
//! authenticated request, and destroyed on logout or when the backend rejects
//! a credential.

pub mod store;

pub use store::SessionStore;
