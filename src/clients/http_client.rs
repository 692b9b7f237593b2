//! HTTP transport for the TikTok Shop open API and token service.
//!
//! [`SignedHttpClient`] sends [`SignedRequest`]s with the access-token header,
//! enforces per-request timeouts and decodes the platform's JSON envelope.
//! It makes exactly one attempt per call; nothing is retried here.

use std::time::Duration;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, SignedRequest, TimeoutClass};
use crate::clients::http_response::PlatformResponse;
use crate::config::{AccessToken, ClientConfig};

/// Header carrying the shop access token on open API calls.
pub const ACCESS_TOKEN_HEADER: &str = "x-tts-access-token";

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Async transport shared by the platform client and the token manager.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct SignedHttpClient {
    client: reqwest::Client,
    config: ClientConfig,
    user_agent: String,
}

// Verify SignedHttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SignedHttpClient>();
};

impl SignedHttpClient {
    /// Creates a transport for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}TikTok Shop API Library v{SDK_VERSION}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            user_agent,
        }
    }

    /// Returns the configuration this transport was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the User-Agent header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the timeout applied to a request class.
    #[must_use]
    pub const fn timeout_for(&self, class: TimeoutClass) -> Duration {
        match class {
            TimeoutClass::Metadata => self.config.metadata_timeout(),
            TimeoutClass::Upload => self.config.upload_timeout(),
        }
    }

    /// Sends a signed open API request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on timeout, network failure, a non-2xx status or
    /// an undecodable body. A decoded response with a non-zero `code` is
    /// returned as `Ok`; judging it is the caller's job.
    pub async fn send(
        &self,
        request: &SignedRequest,
        access_token: Option<&AccessToken>,
    ) -> Result<PlatformResponse, HttpError> {
        let url = format!(
            "{}?{}",
            self.config.api_base_url().join_path(request.path()),
            request.query_string()
        );
        let timeout = self.timeout_for(request.timeout_class());

        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            timestamp = request.timestamp(),
            "Sending signed TikTok Shop request"
        );

        let mut builder = match request.method() {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        builder = builder
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(timeout);

        if let Some(token) = access_token {
            builder = builder.header(ACCESS_TOKEN_HEADER, token.as_ref());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        Self::execute(builder, timeout).await
    }

    /// Sends an unsigned GET to the token service.
    ///
    /// Token endpoints authenticate with the app secret in the query string,
    /// so nothing about this request may be echoed into errors or logs.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn get_token_endpoint(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<PlatformResponse, HttpError> {
        let url = self.config.auth_base_url().join_path(path);
        let timeout = self.config.metadata_timeout();

        tracing::debug!(path, "Calling TikTok Shop token service");

        let builder = self
            .client
            .get(&url)
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(timeout);

        Self::execute(builder, timeout).await
    }

    async fn execute(
        builder: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<PlatformResponse, HttpError> {
        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(e, timeout))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::from_reqwest(e, timeout))?;

        if !(200..300).contains(&status) {
            return Err(HttpError::Response(HttpResponseError {
                status,
                message: text,
            }));
        }

        PlatformResponse::parse(status, &text)
    }
}
