//! The platform API client.
//!
//! Every operation follows the same pipeline:
//!
//! 1. Validate the parameters (no network call on failure)
//! 2. Fetch fresh credentials for the shop
//! 3. Build the query (`app_key`, `timestamp`, `shop_cipher`, `version`, ...)
//! 4. Sign it and append `sign`
//! 5. Send it with the access-token header
//! 6. Treat a non-zero platform `code` as a failure
//!
//! and returns a [`PlatformOperationResult`]. Nothing is retried, and an
//! expired-token response is reported like any other platform error; refresh
//! is the caller's decision (see [`TokenManager`](crate::auth::TokenManager)).

use std::sync::Arc;

use serde_json::Value;

use crate::api::envelope::PlatformOperationResult;
use crate::api::errors::ApiError;
use crate::auth::{CredentialError, CredentialProvider, ShopIdentifier};
use crate::clients::{HttpMethod, PlatformResponse, SignedHttpClient, SignedRequest, TimeoutClass};
use crate::config::ApiVersion;

/// Client for the TikTok Shop order, fulfillment and finance APIs.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tiktok_shop_api::api::{OrderDetailParams, PlatformClient};
/// use tiktok_shop_api::auth::{InMemoryCredentialStore, ShopIdentifier};
/// use tiktok_shop_api::clients::SignedHttpClient;
///
/// let client = PlatformClient::new(SignedHttpClient::new(config), Arc::new(store));
/// let result = client
///     .get_order_detail(
///         &ShopIdentifier::name("Baby Shop"),
///         &OrderDetailParams::new(["577120471396553479"]),
///     )
///     .await;
/// if result.success {
///     println!("{}", result.data);
/// }
/// ```
#[derive(Clone)]
pub struct PlatformClient {
    http: SignedHttpClient,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

// Verify PlatformClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PlatformClient>();
};

impl PlatformClient {
    /// Creates a client reading credentials from `credentials` on every call.
    #[must_use]
    pub fn new(http: SignedHttpClient, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { http, credentials }
    }

    /// Returns the transport.
    #[must_use]
    pub const fn http(&self) -> &SignedHttpClient {
        &self.http
    }

    /// Runs a validated endpoint, or reports the validation failure.
    pub(crate) async fn run(
        &self,
        shop: &ShopIdentifier,
        endpoint: Result<Endpoint, ApiError>,
    ) -> PlatformOperationResult {
        let result = match endpoint {
            Ok(endpoint) => self.execute(shop, endpoint).await,
            Err(error) => Err(error),
        };
        if let Err(error) = &result {
            tracing::warn!(%shop, kind = ?error.kind(), error = %error, "Platform operation failed");
        }
        PlatformOperationResult::from_result(result)
    }

    async fn execute(
        &self,
        shop: &ShopIdentifier,
        endpoint: Endpoint,
    ) -> Result<PlatformResponse, ApiError> {
        let credential = self.credentials.get_credentials(shop).await?;

        let access_token = credential
            .access_token()
            .ok_or_else(|| CredentialError::Incomplete {
                shop: credential.shop_name.clone(),
                field: "an access token",
            })?;
        let cipher = credential
            .shop_cipher()
            .ok_or_else(|| CredentialError::Incomplete {
                shop: credential.shop_name.clone(),
                field: "a shop cipher",
            })?;

        let mut builder = SignedRequest::builder(endpoint.method, endpoint.path)
            .query_param("shop_cipher", cipher.as_ref())
            .query_param("version", endpoint.version)
            .timeout_class(endpoint.timeout_class);
        for (key, value) in endpoint.query {
            builder = builder.query_param(key, value);
        }
        if let Some(body) = endpoint.body {
            builder = builder.body(body);
        }
        let request = builder.sign(&credential.app_key, &credential.app_secret)?;

        let response = self.http.send(&request, Some(access_token)).await?;
        if !response.is_success() {
            return Err(ApiError::PlatformApi {
                code: response.code,
                message: response.message,
                request_id: response.request_id,
            });
        }
        Ok(response)
    }
}

/// One operation's request before credentials are known.
#[derive(Debug)]
pub(crate) struct Endpoint {
    method: HttpMethod,
    path: String,
    version: ApiVersion,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    timeout_class: TimeoutClass,
}

impl Endpoint {
    pub(crate) fn get(version: ApiVersion, family: &str, rest: &str) -> Self {
        Self::new(HttpMethod::Get, version, family, rest)
    }

    pub(crate) fn post(version: ApiVersion, family: &str, rest: &str) -> Self {
        Self::new(HttpMethod::Post, version, family, rest)
    }

    fn new(method: HttpMethod, version: ApiVersion, family: &str, rest: &str) -> Self {
        Self {
            method,
            path: version.path(family, rest),
            version,
            query: Vec::new(),
            body: None,
            timeout_class: TimeoutClass::Metadata,
        }
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(crate) fn query_opt<T: ToString>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub(crate) fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) const fn upload(mut self) -> Self {
        self.timeout_class = TimeoutClass::Upload;
        self
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[cfg(test)]
    pub(crate) const fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Rejects empty values and anything that is unsafe to embed in a path.
pub(crate) fn path_segment(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::validation(format!(
            "{field} may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(value.to_string())
}

/// Rejects an empty required value.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Checks an optional page size against the platform's 1..=100 range.
pub(crate) fn page_size(value: Option<u32>) -> Result<Option<u32>, ApiError> {
    match value {
        Some(size) if !(1..=MAX_PAGE_SIZE).contains(&size) => Err(ApiError::validation(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}"
        ))),
        other => Ok(other),
    }
}

/// Largest page size any list endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;
