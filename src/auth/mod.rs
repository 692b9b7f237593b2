//! Authentication for TikTok Shop API calls.
//!
//! # Overview
//!
//! - [`signature`]: the HMAC-SHA256 request signature engine
//! - [`ShopCredential`]: one connected shop's keys, tokens and cipher
//! - [`CredentialProvider`] / [`CredentialStore`]: where credentials live
//! - [`TokenManager`]: code exchange, single-flight refresh and shop authorization
//!
//! # Token States
//!
//! A shop moves through [`TokenState::Unauthorized`] (provisioned, no tokens),
//! [`TokenState::Authorized`] and [`TokenState::Stale`] (access token past its
//! expiry). A refresh moves a stale shop back to authorized; a failed refresh
//! leaves the stored pair untouched.
//!
//! # Example
//!
//! ```rust
//! use tiktok_shop_api::auth::{ShopCredential, TokenPair, TokenState};
//! use tiktok_shop_api::{AppKey, AppSecret};
//!
//! let shop = ShopCredential::new(
//!     "7495",
//!     "Baby Shop",
//!     AppKey::new("k1").unwrap(),
//!     AppSecret::new("s1").unwrap(),
//! );
//! assert_eq!(shop.token_state(), TokenState::Unauthorized);
//!
//! let shop = shop.with_tokens(TokenPair::new("access", "refresh"));
//! assert_eq!(shop.token_state(), TokenState::Authorized);
//! ```

mod credential;
mod error;
pub mod signature;
mod store;
mod token;

pub use credential::{Platform, ShopCredential, ShopIdentifier, ShopStatus, TokenPair, TokenState};
pub use error::{CredentialError, TokenError};
pub use store::{
    CredentialProvider, CredentialStore, InMemoryCredentialStore, RemoteCredentialLookup,
    LOOKUP_PATH,
};
pub use token::{AuthorizedShop, TokenManager, TOKEN_GET_PATH, TOKEN_REFRESH_PATH};
