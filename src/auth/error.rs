//! Credential and token lifecycle error types.
//!
//! - [`CredentialError`]: a shop's credentials could not be read or written
//! - [`TokenError`]: code exchange, refresh or shop authorization failed
//!
//! Neither type ever renders an app secret or token.

use crate::auth::credential::ShopIdentifier;
use crate::clients::HttpError;
use thiserror::Error;

/// Errors raised by credential providers and stores.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No shop matches the identifier.
    #[error("No shop credentials found for {identifier}")]
    NotFound {
        /// The identifier that was looked up.
        identifier: ShopIdentifier,
    },

    /// The remote lookup service could not be reached or answered badly.
    #[error("Credential lookup failed: {0}")]
    Lookup(#[from] HttpError),

    /// The backing store rejected a read or write.
    #[error("Credential store error: {message}")]
    Storage {
        /// Store diagnostic.
        message: String,
    },

    /// A stored record lacks a field the caller needs.
    #[error("Shop '{shop}' is missing {field}")]
    Incomplete {
        /// Shop name or id.
        shop: String,
        /// What is missing (e.g. "an access token").
        field: &'static str,
    },
}

/// Errors raised by the token lifecycle.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The authorization-code exchange failed at the HTTP or platform level.
    #[error("Authorization code exchange failed (status {status}, code {code}): {message}")]
    AuthExchange {
        /// HTTP status, or 0 when no response was received.
        status: u16,
        /// Platform code, or 0 when not applicable.
        code: i64,
        /// Diagnostic message.
        message: String,
    },

    /// The shop has no refresh token stored.
    #[error("No refresh token available for shop '{shop}'")]
    NoRefreshToken {
        /// Shop name.
        shop: String,
    },

    /// The refresh call failed in transport.
    #[error("Refresh token HTTP error: {0}")]
    RefreshHttp(#[source] HttpError),

    /// The refresh call returned a non-zero code or an incomplete pair.
    #[error("Refresh token API error (code {code}): {message}")]
    RefreshApi {
        /// Platform code.
        code: i64,
        /// Diagnostic message.
        message: String,
    },

    /// Fetching the shops authorized by a fresh token failed.
    #[error("Failed to fetch authorized shops: {message}")]
    ShopLookup {
        /// Diagnostic message.
        message: String,
    },

    /// Reading or persisting credentials failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredentialError>();
    assert_send_sync::<TokenError>();
};
