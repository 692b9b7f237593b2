//! Signed HTTP transport for TikTok Shop API communication.
//!
//! # Overview
//!
//! - [`SignedRequest`]: an ephemeral request carrying its signature and timestamp
//! - [`SignedHttpClient`]: sends signed requests and token-service calls with timeouts
//! - [`PlatformResponse`]: the decoded `{code, message, request_id, data}` body
//! - [`HttpError`]: transport failures (non-2xx, timeout, network, decode)
//!
//! # Example
//!
//! ```rust,ignore
//! use tiktok_shop_api::clients::{HttpMethod, SignedHttpClient, SignedRequest};
//! use tiktok_shop_api::ClientConfig;
//!
//! let client = SignedHttpClient::new(ClientConfig::default());
//! let request = SignedRequest::builder(HttpMethod::Get, "/authorization/202309/shops")
//!     .sign(&app_key, &app_secret)?;
//! let response = client.send(&request, Some(&access_token)).await?;
//! ```
//!
//! # Retry Behavior
//!
//! None. Each call is a single attempt; callers decide whether to retry.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidRequestError};
pub use http_client::{SignedHttpClient, ACCESS_TOKEN_HEADER, SDK_VERSION};
pub use http_request::{HttpMethod, SignedRequest, SignedRequestBuilder, TimeoutClass};
pub use http_response::PlatformResponse;
