//! Configuration types for the TikTok Shop API client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: endpoints and timeouts shared by every outbound call
//! - [`ClientConfigBuilder`]: fluent, fail-fast construction of [`ClientConfig`]
//! - [`AppKey`], [`AppSecret`], [`AccessToken`], [`RefreshToken`], [`ShopCipher`]:
//!   validated or masked credential values
//! - [`BaseUrl`]: a validated http(s) base URL
//! - [`ApiVersion`]: the platform API version an endpoint is bound to
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tiktok_shop_api::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .metadata_timeout(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.api_base_url().as_ref(), "https://open-api.tiktokglobalshop.com");
//! ```

mod newtypes;
mod version;

use std::time::Duration;

pub use newtypes::{AccessToken, AppKey, AppSecret, BaseUrl, RefreshToken, ShopCipher};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Default base URL of the open API (order, fulfillment, finance, authorization).
pub const DEFAULT_API_BASE_URL: &str = "https://open-api.tiktokglobalshop.com";

/// Default base URL of the token service (code exchange, refresh).
pub const DEFAULT_AUTH_BASE_URL: &str = "https://auth.tiktok-shops.com";

/// Default timeout for token and metadata calls.
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for calls that create or upload (packages, shipments).
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-wide configuration.
///
/// Holds no credentials: app key, secret and tokens belong to a
/// [`ShopCredential`](crate::auth::ShopCredential) and are fetched per call.
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_base_url: BaseUrl,
    auth_base_url: BaseUrl,
    metadata_timeout: Duration,
    upload_timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the open API base URL.
    #[must_use]
    pub const fn api_base_url(&self) -> &BaseUrl {
        &self.api_base_url
    }

    /// Returns the token service base URL.
    #[must_use]
    pub const fn auth_base_url(&self) -> &BaseUrl {
        &self.auth_base_url
    }

    /// Returns the timeout applied to token and read calls.
    #[must_use]
    pub const fn metadata_timeout(&self) -> Duration {
        self.metadata_timeout
    }

    /// Returns the timeout applied to create/upload calls.
    #[must_use]
    pub const fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: BaseUrl(DEFAULT_API_BASE_URL.to_string()),
            auth_base_url: BaseUrl(DEFAULT_AUTH_BASE_URL.to_string()),
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            user_agent_prefix: None,
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `api_base_url`: [`DEFAULT_API_BASE_URL`]
/// - `auth_base_url`: [`DEFAULT_AUTH_BASE_URL`]
/// - `metadata_timeout`: 10 seconds
/// - `upload_timeout`: 30 seconds
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_base_url: Option<String>,
    auth_base_url: Option<String>,
    metadata_timeout: Option<Duration>,
    upload_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the open API base URL (useful for regional hosts and mock servers).
    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Overrides the token service base URL.
    #[must_use]
    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = Some(url.into());
        self
    }

    /// Sets the timeout for token and read calls.
    #[must_use]
    pub const fn metadata_timeout(mut self, timeout: Duration) -> Self {
        self.metadata_timeout = Some(timeout);
        self
    }

    /// Sets the timeout for create/upload calls.
    #[must_use]
    pub const fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for outbound requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`], validating every field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for an unusable URL and
    /// [`ConfigError::InvalidTimeout`] for a zero timeout.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let api_base_url =
            BaseUrl::new(self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL))?;
        let auth_base_url =
            BaseUrl::new(self.auth_base_url.as_deref().unwrap_or(DEFAULT_AUTH_BASE_URL))?;

        let metadata_timeout = self.metadata_timeout.unwrap_or(DEFAULT_METADATA_TIMEOUT);
        if metadata_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                field: "metadata_timeout",
            });
        }
        let upload_timeout = self.upload_timeout.unwrap_or(DEFAULT_UPLOAD_TIMEOUT);
        if upload_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                field: "upload_timeout",
            });
        }

        Ok(ClientConfig {
            api_base_url,
            auth_base_url,
            metadata_timeout,
            upload_timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
