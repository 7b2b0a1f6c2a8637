//! Backend endpoint configuration.
//!
//! The backend base URL comes from the `TASTEGROW_API_URL` environment
//! variable, with a local-development fallback. Resolution always succeeds;
//! there is no error case.

/// Environment variable overriding the backend base URL
const BASE_URL_ENV: &str = "TASTEGROW_API_URL";

/// Fallback base URL for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// Loads a `.env` file if one is present, then reads the override
    /// variable. Missing or empty values fall back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            base_url: resolve_base_url(std::env::var(BASE_URL_ENV).ok()),
        }
    }
}

fn resolve_base_url(raw: Option<String>) -> String {
    raw.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_url_fallback() {
        assert_eq!(resolve_base_url(None), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some(String::new())), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some("  ".into())), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_resolve_base_url_override() {
        assert_eq!(
            resolve_base_url(Some("https://api.tastegrow.org".into())),
            "https://api.tastegrow.org"
        );
    }

    #[test]
    fn test_resolve_base_url_strips_trailing_slash() {
        assert_eq!(
            resolve_base_url(Some("http://localhost:4000/".into())),
            "http://localhost:4000"
        );
    }
}
