//! Domain types shared with the backend.

use serde::{Deserialize, Serialize};

/// The authenticated dashboard user, as returned by the login endpoint and
/// persisted alongside the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}
