//! Validated newtype wrappers for configuration values.

use crate::error::ConfigError;
use std::fmt;

/// A validated base API URL.
///
/// Every resource URL built by name (`get_resource`, `get_page`, searches,
/// custom queries) is rooted at this URL. Trailing slashes are trimmed on
/// construction so that joining with a resource name never produces `//`.
///
/// # Example
///
/// ```rust
/// use hal_client::BaseUrl;
///
/// let url = BaseUrl::new("http://localhost:8080/api/").unwrap();
/// assert_eq!(url.as_ref(), "http://localhost:8080/api");
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.host_name(), Some("localhost"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start || remainder.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        let host = &self.url[self.host_start..self.host_end];
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_accepts_http_and_https() {
        assert!(BaseUrl::new("http://localhost:8080").is_ok());
        assert!(BaseUrl::new("https://api.example.com/v1").is_ok());
    }

    #[test]
    fn test_base_url_trims_trailing_slashes() {
        let url = BaseUrl::new("http://localhost:8080/api//").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:8080/api");
    }

    #[test]
    fn test_base_url_extracts_host_name() {
        let url = BaseUrl::new("https://api.example.com:8443/v1").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), Some("api.example.com"));
    }

    #[test]
    fn test_base_url_rejects_missing_scheme() {
        assert!(matches!(
            BaseUrl::new("localhost:8080"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_rejects_missing_host() {
        assert!(BaseUrl::new("http://").is_err());
        assert!(BaseUrl::new("http:///api").is_err());
    }

    #[test]
    fn test_base_url_rejects_whitespace() {
        assert!(BaseUrl::new("http://local host").is_err());
    }
}
