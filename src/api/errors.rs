//! Platform operation errors.
//!
//! Operations never return these directly: they are folded into the failure
//! branch of [`PlatformOperationResult`](crate::api::PlatformOperationResult),
//! which carries the rendered message and an [`ErrorKind`] tag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::CredentialError;
use crate::clients::{HttpError, InvalidRequestError};

/// Coarse classification of an operation failure.
///
/// The proxy layer maps `Validation`, `TooManyIds`, `NotFound` and
/// `PlatformApi` to 4xx responses and the rest to 5xx.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed parameters; no network call was made.
    Validation,
    /// Too many ids in one batch; no network call was made.
    TooManyIds,
    /// The shop is unknown.
    NotFound,
    /// The shop's credentials are incomplete or could not be read.
    Credential,
    /// Non-2xx response, network failure or undecodable body.
    Transport,
    /// The platform did not answer within the timeout.
    Timeout,
    /// HTTP 200 with a non-zero platform code.
    PlatformApi,
}

/// Errors raised while running a platform operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required parameter is missing or malformed.
    #[error("Invalid parameters: {message}")]
    Validation {
        /// What is wrong.
        message: String,
    },

    /// A batch exceeded the platform's limit.
    #[error("Too many ids: {count} given, at most {max} allowed")]
    TooManyIds {
        /// Ids supplied.
        count: usize,
        /// Maximum accepted.
        max: usize,
    },

    /// The HTTP exchange failed.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The platform answered with a non-zero code.
    #[error("API error: {message}, code: {code}")]
    PlatformApi {
        /// Platform code, verbatim.
        code: i64,
        /// Platform message, verbatim.
        message: String,
        /// Platform request id.
        request_id: Option<String>,
    },

    /// Credentials could not be obtained.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl ApiError {
    /// Shorthand for [`ApiError::Validation`].
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::TooManyIds { .. } => ErrorKind::TooManyIds,
            Self::Transport(HttpError::Timeout { .. }) => ErrorKind::Timeout,
            Self::Transport(HttpError::InvalidRequest(_)) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::PlatformApi { .. } => ErrorKind::PlatformApi,
            Self::Credential(CredentialError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Credential(_) => ErrorKind::Credential,
        }
    }
}

impl From<InvalidRequestError> for ApiError {
    fn from(error: InvalidRequestError) -> Self {
        Self::Transport(HttpError::InvalidRequest(error))
    }
}

// Verify ApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};
