//! Configuration types for the HAL client.
//!
//! # Overview
//!
//! - [`HalConfig`]: The configuration struct passed to [`HalClient`](crate::HalClient)
//! - [`HalConfigBuilder`]: A builder for constructing [`HalConfig`] instances
//! - [`BaseUrl`]: A validated base API URL
//!
//! Configuration is instance-based. Nothing is stored in process-wide state;
//! two clients pointed at different APIs can coexist in one program.
//!
//! # Example
//!
//! ```rust
//! use hal_client::{HalConfig, BaseUrl};
//!
//! let config = HalConfig::builder()
//!     .base_api_url(BaseUrl::new("http://localhost:8080/api").unwrap())
//!     .verbose_logs(true)
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use chrono::TimeDelta;

use crate::error::ConfigError;

/// Page size used when a paged operation is invoked without page options.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Configuration for the HAL client.
///
/// # Thread Safety
///
/// `HalConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct HalConfig {
    base_api_url: BaseUrl,
    verbose_logs: bool,
    cache_enabled: bool,
    cache_lifetime: Option<TimeDelta>,
    default_page_size: u32,
    user_agent_prefix: Option<String>,
}

impl HalConfig {
    /// Creates a new builder for constructing a `HalConfig`.
    #[must_use]
    pub fn builder() -> HalConfigBuilder {
        HalConfigBuilder::new()
    }

    /// Returns the base API URL.
    #[must_use]
    pub const fn base_api_url(&self) -> &BaseUrl {
        &self.base_api_url
    }

    /// Returns whether request and response bodies are logged.
    #[must_use]
    pub const fn verbose_logs(&self) -> bool {
        self.verbose_logs
    }

    /// Returns whether GET requests consult and populate the response cache.
    #[must_use]
    pub const fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Returns how long the default in-memory cache keeps an entry.
    ///
    /// `None` means entries live until overwritten by a newer fetch.
    #[must_use]
    pub const fn cache_lifetime(&self) -> Option<TimeDelta> {
        self.cache_lifetime
    }

    /// Returns the page size used when no page options are supplied.
    #[must_use]
    pub const fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify HalConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HalConfig>();
};

/// Builder for constructing [`HalConfig`] instances.
///
/// `base_api_url` is required. Defaults:
///
/// - `verbose_logs`: `false`
/// - `cache_enabled`: `true`
/// - `cache_lifetime`: `None`
/// - `default_page_size`: [`DEFAULT_PAGE_SIZE`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct HalConfigBuilder {
    base_api_url: Option<BaseUrl>,
    verbose_logs: Option<bool>,
    cache_enabled: Option<bool>,
    cache_lifetime: Option<TimeDelta>,
    default_page_size: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl HalConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base API URL (required).
    #[must_use]
    pub fn base_api_url(mut self, url: BaseUrl) -> Self {
        self.base_api_url = Some(url);
        self
    }

    /// Enables logging of request and response bodies at debug level.
    #[must_use]
    pub const fn verbose_logs(mut self, verbose: bool) -> Self {
        self.verbose_logs = Some(verbose);
        self
    }

    /// Enables or disables the response cache for GET requests.
    #[must_use]
    pub const fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = Some(enabled);
        self
    }

    /// Sets how long the default in-memory cache keeps an entry.
    #[must_use]
    pub const fn cache_lifetime(mut self, lifetime: TimeDelta) -> Self {
        self.cache_lifetime = Some(lifetime);
        self
    }

    /// Sets the page size used when no page options are supplied.
    #[must_use]
    pub const fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = Some(size);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`HalConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_api_url` is not set,
    /// or [`ConfigError::InvalidPageSize`] if the default page size is zero.
    pub fn build(self) -> Result<HalConfig, ConfigError> {
        let base_api_url = self.base_api_url.ok_or(ConfigError::MissingRequiredField {
            field: "base_api_url",
        })?;

        let default_page_size = self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if default_page_size == 0 {
            return Err(ConfigError::InvalidPageSize {
                size: default_page_size,
            });
        }

        Ok(HalConfig {
            base_api_url,
            verbose_logs: self.verbose_logs.unwrap_or(false),
            cache_enabled: self.cache_enabled.unwrap_or(true),
            cache_lifetime: self.cache_lifetime,
            default_page_size,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> BaseUrl {
        BaseUrl::new("http://localhost:8080/api").unwrap()
    }

    #[test]
    fn test_builder_requires_base_api_url() {
        let result = HalConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "base_api_url"
            })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = HalConfig::builder().base_api_url(base_url()).build().unwrap();

        assert_eq!(config.base_api_url().as_ref(), "http://localhost:8080/api");
        assert!(!config.verbose_logs());
        assert!(config.cache_enabled());
        assert!(config.cache_lifetime().is_none());
        assert_eq!(config.default_page_size(), DEFAULT_PAGE_SIZE);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_rejects_zero_page_size() {
        let result = HalConfig::builder()
            .base_api_url(base_url())
            .default_page_size(0)
            .build();

        assert!(matches!(result, Err(ConfigError::InvalidPageSize { size: 0 })));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = HalConfig::builder()
            .base_api_url(base_url())
            .verbose_logs(true)
            .cache_enabled(false)
            .cache_lifetime(TimeDelta::seconds(30))
            .default_page_size(50)
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert!(config.verbose_logs());
        assert!(!config.cache_enabled());
        assert_eq!(config.cache_lifetime(), Some(TimeDelta::seconds(30)));
        assert_eq!(config.default_page_size(), 50);
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HalConfig>();
    }
}
