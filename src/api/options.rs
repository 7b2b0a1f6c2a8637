use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use super::ApiError;

/// The options recognized by [`ApiClient::send`](super::ApiClient::send).
///
/// Constructed and discarded per call; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method (default `GET`)
    pub method: Method,
    /// Caller headers, merged over the default `Content-Type: application/json`
    pub headers: HeaderMap,
    /// JSON-encoded request body, if any
    pub body: Option<Vec<u8>>,
    /// Attach the stored bearer credential (default `true`)
    pub requires_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
            requires_auth: true,
        }
    }

    /// Skip credential attachment, for endpoints that do not require a session
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// Set a header, overriding the JSON-content default if the name collides
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serialize a payload as the JSON request body
    pub fn json<B: Serialize + ?Sized>(mut self, payload: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_vec(payload)?);
        Ok(self)
    }
}
