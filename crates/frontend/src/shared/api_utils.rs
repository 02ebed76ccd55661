//! API utilities for talking to the personalization service
//!
//! Provides helper functions for constructing API URLs.

/// Development default; the personalization service listens here locally.
const DEFAULT_API_BASE: &str = "http://localhost:8001";

/// Get the base URL for API requests
///
/// Taken from the `PERSONALIZER_API_URL` environment variable at compile
/// time, falling back to the local development address when unset. A
/// trailing slash is stripped so paths can be appended verbatim.
///
/// # Example
/// ```rust
/// use frontend::shared::api_utils::api_base;
/// let url = format!("{}/api/personalize", api_base());
/// ```
pub fn api_base() -> String {
    option_env!("PERSONALIZER_API_URL")
        .map(|base| base.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Build a full API URL from a path
///
/// # Arguments
/// * `path` - The API path (should start with "/api/")
///
/// # Example
/// ```rust
/// use frontend::shared::api_utils::api_url;
/// let url = api_url("/api/personalize");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_has_no_trailing_slash() {
        assert!(!api_base().ends_with('/'));
    }

    #[test]
    fn url_appends_path_to_base() {
        let url = api_url("/api/personalize");
        assert!(url.ends_with("/api/personalize"));
        assert!(url.starts_with(&api_base()));
    }
}
