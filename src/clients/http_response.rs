//! Platform response parsing.
//!
//! Every open API and token service response shares one JSON shape:
//!
//! ```json
//! {"code": 0, "message": "Success", "request_id": "2023...", "data": {...}}
//! ```
//!
//! `code == 0` is success. Any other code is an application-level failure,
//! even when the HTTP status is 200.

use serde::Deserialize;

use crate::clients::errors::HttpError;

/// A decoded platform response.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformResponse {
    /// HTTP status code.
    pub status: u16,
    /// Platform response code; `0` means success.
    pub code: i64,
    /// Human-readable platform message.
    pub message: String,
    /// Platform-assigned request id, for support tickets.
    pub request_id: Option<String>,
    /// Operation payload; `Null` when absent.
    pub data: serde_json::Value,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    data: serde_json::Value,
}

impl PlatformResponse {
    /// Decodes a response body.
    ///
    /// A body without a `code` field cannot be judged a success and is
    /// rejected as a decode error.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body is not a JSON object with a
    /// numeric `code`.
    pub fn parse(status: u16, body: &str) -> Result<Self, HttpError> {
        let raw: RawResponse = serde_json::from_str(body).map_err(|e| HttpError::Decode {
            message: e.to_string(),
        })?;
        let code = raw.code.ok_or_else(|| HttpError::Decode {
            message: "response has no 'code' field".to_string(),
        })?;

        Ok(Self {
            status,
            code,
            message: raw.message.unwrap_or_default(),
            request_id: raw.request_id,
            data: raw.data,
        })
    }

    /// Returns `true` if the platform reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }
}
