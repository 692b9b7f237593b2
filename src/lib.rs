//! # TikTok Shop API Rust Client
//!
//! Request signing, token lifecycle and order/fulfillment/finance calls for
//! the TikTok Shop open API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for app keys, secrets, tokens and shop ciphers
//! - The HMAC-SHA256 request signature engine in [`auth::signature`]
//! - Pluggable credential storage via [`auth::CredentialProvider`] and [`auth::CredentialStore`]
//! - Authorization-code exchange and single-flight token refresh via [`auth::TokenManager`]
//! - Seven platform operations on [`api::PlatformClient`], each returning a
//!   uniform [`api::PlatformOperationResult`] envelope
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use tiktok_shop_api::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .metadata_timeout(Duration::from_secs(10))
//!     .upload_timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Signing
//!
//! ```rust
//! use tiktok_shop_api::auth::signature::sign;
//!
//! let queries = [
//!     ("app_key", "k1"),
//!     ("timestamp", "1700000000"),
//!     ("ids", "1,2"),
//!     ("shop_cipher", "c1"),
//!     ("version", "202507"),
//! ];
//! assert_eq!(
//!     sign("/order/202507/orders", queries, "s1", None),
//!     "b14155f779ae57c457713ffd63db13d95762cebbc4a69283142b50a8e3ab83ad"
//! );
//! ```
//!
//! ## Platform Calls
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tiktok_shop_api::api::{OrderSearchParams, PlatformClient};
//! use tiktok_shop_api::auth::{InMemoryCredentialStore, ShopIdentifier};
//! use tiktok_shop_api::clients::SignedHttpClient;
//! use tiktok_shop_api::ClientConfig;
//!
//! let http = SignedHttpClient::new(ClientConfig::default());
//! let client = PlatformClient::new(http, Arc::new(store));
//!
//! let shop = ShopIdentifier::name("Baby Shop");
//! let mut params = OrderSearchParams::with_status("AWAITING_SHIPMENT");
//! loop {
//!     let page = client.search_orders(&shop, &params).await;
//!     if !page.success {
//!         eprintln!("{:?}: {}", page.error_kind, page.error.unwrap_or_default());
//!         break;
//!     }
//!     match page.next_page_token() {
//!         Some(token) => params = params.page_token(token),
//!         None => break,
//!     }
//! }
//! ```
//!
//! ## Token Refresh
//!
//! Refresh is explicit. The platform client reports an expired token like
//! any other platform error and never refreshes on its own:
//!
//! ```rust,ignore
//! let shop = store.get_credentials(&ShopIdentifier::name("Baby Shop")).await?;
//! if shop.token_state() == TokenState::Stale {
//!     token_manager.refresh_access_token(&shop).await?;
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber. Secrets,
//! tokens and signatures are never logged.

pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{
    AccessToken, ApiVersion, AppKey, AppSecret, BaseUrl, ClientConfig, ClientConfigBuilder,
    RefreshToken, ShopCipher,
};
pub use error::ConfigError;

// Re-export transport types
pub use clients::{
    HttpError, HttpMethod, HttpResponseError, InvalidRequestError, PlatformResponse,
    SignedHttpClient, SignedRequest, SignedRequestBuilder,
};

// Re-export credential and token types
pub use auth::{
    CredentialError, CredentialProvider, CredentialStore, ShopCredential, ShopIdentifier,
    TokenError, TokenManager, TokenPair, TokenState,
};

// Re-export platform operation types
pub use api::{ApiError, ErrorKind, PlatformClient, PlatformOperationResult};
