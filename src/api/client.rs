//! Authenticated request wrapper for the Taste & Grow backend.
//!
//! Every dashboard call goes through [`ApiClient::send`]: headers are merged
//! over a JSON-content default, the stored bearer credential is attached when
//! the call requires authentication, and a 401 on an authenticated call tears
//! the session down and emits a session-expired event.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::config::Config;
use crate::models::AuthUser;

use super::{ApiError, RequestOptions};

/// Route the hosting application should navigate to after session teardown
pub const LOGIN_ROUTE: &str = "/login";

/// Login endpoint, the one call that never carries a credential
const LOGIN_ENDPOINT: &str = "/auth/login";

/// Callback invoked after session teardown, with the route to navigate to.
///
/// The wrapper never touches the UI itself; the hosting application
/// subscribes and performs the actual navigation. May fire more than once
/// when concurrent calls hit 401 together.
pub type SessionExpiredHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: serde_json::Value,
}

/// API client for the Taste & Grow backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and clones share the same session store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: SessionStore,
    on_session_expired: Option<SessionExpiredHandler>,
}

impl ApiClient {
    /// Create a client with the environment-resolved base URL and an
    /// in-memory session store
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    /// Create a client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the resolved backend base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the session store shared with this client
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Dispatch a request to the backend.
    ///
    /// Headers are merged over a `Content-Type: application/json` default.
    /// When `options.requires_auth` is set and a token is stored, an
    /// `Authorization: Bearer <token>` header is attached; an absent token is
    /// not an error and the request goes out without the header.
    ///
    /// Endpoints carrying a scheme are used as-is, anything else is prefixed
    /// with the base URL.
    ///
    /// A 401 response on an authenticated call clears the stored session,
    /// fires the session-expired handler with [`LOGIN_ROUTE`], and returns
    /// [`ApiError::SessionExpired`] so the caller cannot misread the response
    /// body. Every other status, including 401 on an unauthenticated call,
    /// comes back as the raw response for the caller to inspect. Network
    /// failures propagate unmodified; there is no retry.
    pub async fn send(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        let url = self.resolve_url(endpoint);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        for (name, value) in &options.headers {
            headers.insert(name, value.clone());
        }

        if options.requires_auth {
            match self.store.token() {
                Some(token) => {
                    headers.insert(
                        header::AUTHORIZATION,
                        header::HeaderValue::from_str(&format!("Bearer {}", token))?,
                    );
                }
                // No stored credential: send anyway and let the backend
                // decide; a 401 lands in the teardown path below.
                None => debug!(endpoint, "no stored credential for authenticated request"),
            }
        }

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        debug!(method = %options.method, %url, "dispatching request");
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED && options.requires_auth {
            warn!(%url, "credential rejected, tearing down session");
            self.expire_session();
            return Err(ApiError::SessionExpired);
        }

        Ok(response)
    }

    // ===== Verb convenience layer =====

    pub async fn get(&self, endpoint: &str) -> Result<Response, ApiError> {
        self.send(endpoint, RequestOptions::new(Method::GET)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Response, ApiError> {
        self.send(endpoint, RequestOptions::new(Method::DELETE))
            .await
    }

    /// POST, with an optional JSON payload; `None` sends no body
    pub async fn post<B: Serialize>(
        &self,
        endpoint: &str,
        payload: Option<&B>,
    ) -> Result<Response, ApiError> {
        self.send_with_payload(Method::POST, endpoint, payload).await
    }

    /// PATCH, with an optional JSON payload; `None` sends no body
    pub async fn patch<B: Serialize>(
        &self,
        endpoint: &str,
        payload: Option<&B>,
    ) -> Result<Response, ApiError> {
        self.send_with_payload(Method::PATCH, endpoint, payload)
            .await
    }

    /// PUT, with an optional JSON payload; `None` sends no body
    pub async fn put<B: Serialize>(
        &self,
        endpoint: &str,
        payload: Option<&B>,
    ) -> Result<Response, ApiError> {
        self.send_with_payload(Method::PUT, endpoint, payload).await
    }

    /// GET an endpoint and deserialize a successful JSON response.
    /// Non-success statuses map through [`ApiError::from_status`].
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let response = self.get(endpoint).await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    // ===== Session lifecycle =====

    /// Log in against the backend and persist the resulting session.
    ///
    /// The login call itself never carries a credential. Invalid credentials
    /// surface as [`ApiError::Unauthorized`], not as a session teardown.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let options = RequestOptions::new(Method::POST).public().json(&body)?;

        let response = self.send(LOGIN_ENDPOINT, options).await?;
        let response = Self::check_response(response).await?;

        let login: LoginResponse = response.json().await?;
        let user: AuthUser = serde_json::from_value(login.user.clone())?;
        self.store.set_session(&login.token, &login.user)?;

        debug!(email, "login succeeded");
        Ok(user)
    }

    /// Discard the stored session. The backend holds no server-side session,
    /// so logout is purely a client-side teardown.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store.clear()?;
        Ok(())
    }

    // ===== Internals =====

    fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url, endpoint)
        }
    }

    async fn send_with_payload<B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&B>,
    ) -> Result<Response, ApiError> {
        let mut options = RequestOptions::new(method);
        if let Some(payload) = payload {
            options = options.json(payload)?;
        }
        self.send(endpoint, options).await
    }

    /// Tear down the session: clear both stored entries and notify the host.
    /// Clearing an already-cleared store is a no-op, so concurrent 401s are
    /// tolerated; a storage failure is logged and never masks the
    /// session-expired signal.
    fn expire_session(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear session storage");
        }
        if let Some(ref handler) = self.on_session_expired {
            handler(LOGIN_ROUTE);
        }
    }

    /// Check if a response is successful, returning an error with body if not
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    store: Option<SessionStore>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    on_session_expired: Option<SessionExpiredHandler>,
}

impl ApiClientBuilder {
    /// Set the backend base URL, overriding environment resolution
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session store, typically [`SessionStore::open_default`]
    pub fn store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Set a request timeout. None by default; a host wanting bounded
    /// latency layers it here.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Register the callback invoked after session teardown
    pub fn on_session_expired(mut self, handler: SessionExpiredHandler) -> Self {
        self.on_session_expired = Some(handler);
        self
    }

    /// Build the client. The base URL falls back to [`Config::from_env`],
    /// which always resolves; the only error case is HTTP client setup.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = self
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| Config::from_env().base_url);

        let mut client_builder = Client::builder();
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let user_agent = self.user_agent.unwrap_or_else(|| {
            concat!("tastegrow-client/", env!("CARGO_PKG_VERSION")).to_string()
        });
        let client = client_builder.user_agent(user_agent).build()?;

        Ok(ApiClient {
            client,
            base_url,
            store: self.store.unwrap_or_else(SessionStore::in_memory),
            on_session_expired: self.on_session_expired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::builder()
            .base_url(base_url)
            .build()
            .expect("Failed to build test client")
    }

    #[test]
    fn test_resolve_url_prefixes_relative_endpoints() {
        let client = client("http://localhost:3000");
        assert_eq!(
            client.resolve_url("/users"),
            "http://localhost:3000/users"
        );
    }

    #[test]
    fn test_resolve_url_passes_absolute_endpoints_through() {
        let client = client("http://localhost:3000");
        assert_eq!(
            client.resolve_url("https://api.example.com/x"),
            "https://api.example.com/x"
        );
        assert_eq!(
            client.resolve_url("http://other.example.com/y"),
            "http://other.example.com/y"
        );
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = client("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
