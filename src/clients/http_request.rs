//! Signed request construction.
//!
//! A [`SignedRequest`] is an ephemeral value: it is built, signed with a fresh
//! timestamp and sent once. Query values are stored as the final strings
//! placed in the URL, and the body is serialized once, so the signed material
//! and the wire bytes cannot drift apart.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;

use crate::auth::signature;
use crate::clients::errors::InvalidRequestError;
use crate::config::{AppKey, AppSecret};

/// HTTP methods used by the open API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Which configured timeout a request runs under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeoutClass {
    /// Token, lookup and read calls.
    #[default]
    Metadata,
    /// Calls that create resources or upload data.
    Upload,
}

/// A fully signed request, ready to send.
#[derive(Clone, Debug)]
pub struct SignedRequest {
    method: HttpMethod,
    path: String,
    query: BTreeMap<String, String>,
    body: Option<String>,
    signature: String,
    timestamp: i64,
    timeout_class: TimeoutClass,
}

impl SignedRequest {
    /// Creates a new builder for a request to `path`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tiktok_shop_api::clients::{HttpMethod, SignedRequest};
    /// use tiktok_shop_api::{AppKey, AppSecret};
    ///
    /// let request = SignedRequest::builder(HttpMethod::Get, "/order/202507/orders")
    ///     .query_param("ids", "1,2")
    ///     .query_param("shop_cipher", "c1")
    ///     .query_param("version", "202507")
    ///     .timestamp(1_700_000_000)
    ///     .sign(&AppKey::new("k1").unwrap(), &AppSecret::new("s1").unwrap())
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     request.signature(),
    ///     "b14155f779ae57c457713ffd63db13d95762cebbc4a69283142b50a8e3ab83ad"
    /// );
    /// ```
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> SignedRequestBuilder {
        SignedRequestBuilder::new(method, path)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the signed query parameters (without `sign`), in canonical order.
    #[must_use]
    pub const fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Returns the serialized JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the computed signature.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns the Unix timestamp the request was signed with.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the timeout class.
    #[must_use]
    pub const fn timeout_class(&self) -> TimeoutClass {
        self.timeout_class
    }

    /// Returns the URL-encoded query string with `sign` appended last.
    #[must_use]
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once(("sign", self.signature.as_str())))
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Builder for [`SignedRequest`].
#[derive(Debug)]
pub struct SignedRequestBuilder {
    method: HttpMethod,
    path: String,
    query: BTreeMap<String, String>,
    body: Option<serde_json::Value>,
    timestamp: Option<i64>,
    timeout_class: TimeoutClass,
}

impl SignedRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
            timestamp: None,
            timeout_class: TimeoutClass::default(),
        }
    }

    /// Adds a query parameter. The value is stringified once, here, and that
    /// exact string is both signed and sent.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Adds a query parameter only if `value` is `Some`.
    #[must_use]
    pub fn query_param_opt<T: ToString>(self, key: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Pins the timestamp instead of using the current time.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the timeout class.
    #[must_use]
    pub const fn timeout_class(mut self, class: TimeoutClass) -> Self {
        self.timeout_class = class;
        self
    }

    /// Adds `app_key` and `timestamp`, then signs the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] for a relative path or a caller-supplied
    /// `sign` parameter.
    pub fn sign(
        mut self,
        app_key: &AppKey,
        app_secret: &AppSecret,
    ) -> Result<SignedRequest, InvalidRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidRequestError::RelativePath { path: self.path });
        }
        if self.query.contains_key("sign") {
            return Err(InvalidRequestError::ReservedQueryKey {
                key: "sign".to_string(),
            });
        }
        // Tokens travel in a header, never in the query string.
        self.query.remove("access_token");

        let timestamp = self.timestamp.unwrap_or_else(|| Utc::now().timestamp());
        self.query
            .insert("app_key".to_string(), app_key.as_ref().to_string());
        self.query
            .insert("timestamp".to_string(), timestamp.to_string());

        let body = self.body.as_ref().and_then(signature::signable_body);
        let signature = signature::sign_serialized(
            &self.path,
            &self.query,
            app_secret.as_ref(),
            body.as_deref(),
        );

        Ok(SignedRequest {
            method: self.method,
            path: self.path,
            query: self.query,
            body,
            signature,
            timestamp,
            timeout_class: self.timeout_class,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key() -> AppKey {
        AppKey::new("k1").unwrap()
    }

    fn secret() -> AppSecret {
        AppSecret::new("s1").unwrap()
    }

    #[test]
    fn test_sign_adds_app_key_and_timestamp() {
        let request = SignedRequest::builder(HttpMethod::Get, "/authorization/202309/shops")
            .timestamp(1_700_000_000)
            .sign(&key(), &secret())
            .unwrap();

        assert_eq!(request.query().get("app_key"), Some(&"k1".to_string()));
        assert_eq!(
            request.query().get("timestamp"),
            Some(&"1700000000".to_string())
        );
        assert_eq!(request.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_signature_matches_signature_engine() {
        let request = SignedRequest::builder(HttpMethod::Get, "/order/202507/orders")
            .query_param("ids", "1,2")
            .query_param("shop_cipher", "c1")
            .query_param("version", "202507")
            .timestamp(1_700_000_000)
            .sign(&key(), &secret())
            .unwrap();

        assert_eq!(
            request.signature(),
            "b14155f779ae57c457713ffd63db13d95762cebbc4a69283142b50a8e3ab83ad"
        );
    }

    #[test]
    fn test_query_string_is_encoded_and_ends_with_sign() {
        let request = SignedRequest::builder(HttpMethod::Get, "/order/202507/orders")
            .query_param("ids", "1,2")
            .timestamp(1_700_000_000)
            .sign(&key(), &secret())
            .unwrap();

        let qs = request.query_string();
        assert!(qs.starts_with("app_key=k1&ids=1%2C2&timestamp=1700000000&sign="));
        assert!(qs.ends_with(request.signature()));
    }

    #[test]
    fn test_numeric_values_are_signed_as_sent() {
        let request = SignedRequest::builder(HttpMethod::Post, "/order/202309/orders/search")
            .query_param("page_size", 20_u32)
            .timestamp(1_700_000_000)
            .sign(&key(), &secret())
            .unwrap();

        assert_eq!(request.query().get("page_size"), Some(&"20".to_string()));
        assert!(signature::verify_signature(
            request.path(),
            request.query(),
            "s1",
            request.body(),
            request.signature(),
        ));
    }

    #[test]
    fn test_body_is_serialized_once_and_signed() {
        let request = SignedRequest::builder(HttpMethod::Post, "/fulfillment/202309/packages")
            .query_param("shop_cipher", "c1")
            .query_param("version", "202309")
            .body(json!({"order_id": "577120471396553479", "weight": {"value": "0.25", "unit": "lb"}}))
            .timestamp(1_700_000_000)
            .sign(&key(), &secret())
            .unwrap();

        assert_eq!(
            request.body(),
            Some(r#"{"order_id":"577120471396553479","weight":{"value":"0.25","unit":"lb"}}"#)
        );
        assert_eq!(
            request.signature(),
            "e615e55747437182a8211f63a3aa0dca364f63a403bfa2070ea5fc2d82290137"
        );
    }

    #[test]
    fn test_empty_body_is_dropped() {
        let request = SignedRequest::builder(HttpMethod::Post, "/order/202309/orders/search")
            .body(json!({}))
            .sign(&key(), &secret())
            .unwrap();
        assert!(request.body().is_none());
    }

    #[test]
    fn test_access_token_never_lands_in_query() {
        let request = SignedRequest::builder(HttpMethod::Get, "/x")
            .query_param("access_token", "secret-token")
            .sign(&key(), &secret())
            .unwrap();
        assert!(!request.query_string().contains("secret-token"));
    }

    #[test]
    fn test_rejects_relative_path_and_reserved_sign() {
        let result = SignedRequest::builder(HttpMethod::Get, "orders").sign(&key(), &secret());
        assert!(matches!(result, Err(InvalidRequestError::RelativePath { .. })));

        let result = SignedRequest::builder(HttpMethod::Get, "/orders")
            .query_param("sign", "abc")
            .sign(&key(), &secret());
        assert!(matches!(
            result,
            Err(InvalidRequestError::ReservedQueryKey { key }) if key == "sign"
        ));
    }

    #[test]
    fn test_fresh_timestamp_when_not_pinned() {
        let before = Utc::now().timestamp();
        let request = SignedRequest::builder(HttpMethod::Get, "/x")
            .sign(&key(), &secret())
            .unwrap();
        assert!(request.timestamp() >= before);
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }
}
