//! Configuration error types for the TikTok Shop API client.
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use tiktok_shop_api::{AppKey, ConfigError};
//!
//! let result = AppKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAppKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building client configuration or credentials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// App key cannot be empty.
    #[error("App key cannot be empty. Please provide the app key issued in the TikTok Shop partner center.")]
    EmptyAppKey,

    /// App secret cannot be empty.
    #[error("App secret cannot be empty. Please provide the app secret issued in the TikTok Shop partner center.")]
    EmptyAppSecret,

    /// A base URL could not be parsed or is not http(s).
    #[error("Invalid base URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://open-api.tiktokglobalshop.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A timeout was configured as zero.
    #[error("Invalid timeout for '{field}'. Timeouts must be greater than zero.")]
    InvalidTimeout {
        /// The name of the timeout setting.
        field: &'static str,
    },

    /// API version string is not one this client knows how to call.
    #[error("Invalid API version '{version}'. Expected a supported version such as '202309' or '202507'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_app_key_error_message() {
        let message = ConfigError::EmptyAppKey.to_string();
        assert!(message.contains("App key cannot be empty"));
    }

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("absolute URL"));
    }

    #[test]
    fn test_invalid_timeout_names_field() {
        let error = ConfigError::InvalidTimeout {
            field: "metadata_timeout",
        };
        assert!(error.to_string().contains("metadata_timeout"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyAppSecret;
        let _: &dyn std::error::Error = &error;
    }
}
