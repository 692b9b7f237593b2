//! Transport error types.
//!
//! - [`HttpResponseError`]: a non-2xx HTTP response
//! - [`InvalidRequestError`]: a request rejected before it was signed or sent
//! - [`HttpError`]: unified transport error, including timeouts
//!
//! A response with HTTP 200 and a non-zero platform `code` is *not* a
//! transport error; it is reported by the API layer as
//! [`ApiError::PlatformApi`](crate::api::ApiError::PlatformApi).
//!
//! Network errors are stored without their URL: token endpoints carry the app
//! secret in the query string, and error text must never expose it.

use std::time::Duration;

use thiserror::Error;

/// Error returned when a request receives a non-successful HTTP status.
///
/// # Example
///
/// ```rust
/// use tiktok_shop_api::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     status: 502,
///     message: "Bad Gateway".to_string(),
/// };
/// assert_eq!(error.to_string(), "HTTP error! status: 502, message: Bad Gateway");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP error! status: {status}, message: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// Raw response text (possibly empty).
    pub message: String,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// Request paths must be absolute (`/order/...`).
    #[error("Request path '{path}' must start with '/'.")]
    RelativePath {
        /// The offending path.
        path: String,
    },

    /// `sign` is computed by the client and cannot be supplied by the caller.
    #[error("Query parameter '{key}' is reserved and set by the client.")]
    ReservedQueryKey {
        /// The reserved key that was supplied.
        key: String,
    },
}

/// Unified error type for all transport failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-2xx response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// The request did not complete within its timeout.
    #[error("Request timed out after {}ms", after.as_millis())]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// Connection, TLS or protocol error.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// The response body was not the JSON shape the platform documents.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Parser diagnostic.
        message: String,
    },
}

impl HttpError {
    /// Classifies a reqwest error, stripping the URL from anything kept.
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout { after: timeout }
        } else {
            Self::Network(error.without_url())
        }
    }

    /// Returns the HTTP status for response errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.status),
            _ => None,
        }
    }

    /// Returns `true` for timeouts.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
