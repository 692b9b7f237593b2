//! The uniform result envelope returned by every platform operation.
//!
//! ```json
//! {"success": true, "data": {...}, "request_id": "...", "code": 0, "message": "Success"}
//! {"success": false, "data": null, "error": "...", "error_kind": "platform_api", "code": 105002}
//! ```
//!
//! `data` is always present; absent optional fields are omitted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::errors::{ApiError, ErrorKind};
use crate::clients::PlatformResponse;

/// Outcome of one platform operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformOperationResult {
    /// `true` if the platform accepted the call.
    pub success: bool,
    /// Operation payload, opaque to this crate; `null` on failure.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Platform request id, when the platform answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Platform response code, when the platform answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Platform message, when the platform answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Rendered failure, on failure only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure classification, on failure only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl PlatformOperationResult {
    /// Builds a success envelope from a platform response.
    #[must_use]
    pub fn success(response: PlatformResponse) -> Self {
        Self {
            success: true,
            data: response.data,
            request_id: response.request_id,
            code: Some(response.code),
            message: Some(response.message),
            error: None,
            error_kind: None,
        }
    }

    /// Builds a failure envelope. Platform errors keep their code, message
    /// and request id.
    #[must_use]
    pub fn failure(error: &ApiError) -> Self {
        let (code, message, request_id) = match error {
            ApiError::PlatformApi {
                code,
                message,
                request_id,
            } => (Some(*code), Some(message.clone()), request_id.clone()),
            _ => (None, None, None),
        };
        Self {
            success: false,
            data: serde_json::Value::Null,
            request_id,
            code,
            message,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }

    /// Folds an operation outcome into an envelope.
    #[must_use]
    pub fn from_result(result: Result<PlatformResponse, ApiError>) -> Self {
        match result {
            Ok(response) => Self::success(response),
            Err(error) => Self::failure(&error),
        }
    }

    /// Returns `true` on success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the page token for the next page, if the payload has one.
    ///
    /// Pass it back unchanged as the `page_token` (or `cursor`) of the next
    /// list call. An empty token means the last page was reached.
    #[must_use]
    pub fn next_page_token(&self) -> Option<&str> {
        ["next_page_token", "next_cursor"]
            .iter()
            .find_map(|key| self.data.get(key).and_then(serde_json::Value::as_str))
            .filter(|token| !token.is_empty())
    }

    /// Deserializes the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns the serde error if `data` does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(data: serde_json::Value) -> PlatformResponse {
        PlatformResponse {
            status: 200,
            code: 0,
            message: "Success".to_string(),
            request_id: Some("req-1".to_string()),
            data,
        }
    }

    #[test]
    fn test_success_envelope_serialization() {
        let envelope = PlatformOperationResult::success(response(json!({"orders": []})));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "data": {"orders": []},
                "request_id": "req-1",
                "code": 0,
                "message": "Success"
            })
        );
    }

    #[test]
    fn test_failure_envelope_keeps_null_data() {
        let envelope = PlatformOperationResult::failure(&ApiError::validation("order_id is required"));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["success"], false);
        assert!(value.get("data").unwrap().is_null());
        assert_eq!(value["error_kind"], "validation");
        assert!(value["error"].as_str().unwrap().contains("order_id"));
        assert!(value.get("code").is_none());
    }

    #[test]
    fn test_platform_failure_keeps_code_and_request_id() {
        let envelope = PlatformOperationResult::failure(&ApiError::PlatformApi {
            code: 36_009_003,
            message: "Order not found".to_string(),
            request_id: Some("req-9".to_string()),
        });

        assert!(!envelope.is_success());
        assert_eq!(envelope.code, Some(36_009_003));
        assert_eq!(envelope.request_id.as_deref(), Some("req-9"));
        assert_eq!(envelope.message.as_deref(), Some("Order not found"));
    }

    #[test]
    fn test_next_page_token() {
        let envelope = PlatformOperationResult::success(response(json!({"next_page_token": "abc"})));
        assert_eq!(envelope.next_page_token(), Some("abc"));

        let last = PlatformOperationResult::success(response(json!({"next_page_token": ""})));
        assert_eq!(last.next_page_token(), None);

        let cursor = PlatformOperationResult::success(response(json!({"next_cursor": "c2"})));
        assert_eq!(cursor.next_page_token(), Some("c2"));
    }

    #[test]
    fn test_data_as() {
        #[derive(Deserialize)]
        struct Page {
            total_count: u32,
        }
        let envelope = PlatformOperationResult::success(response(json!({"total_count": 7})));
        assert_eq!(envelope.data_as::<Page>().unwrap().total_count, 7);
    }
}
