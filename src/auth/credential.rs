//! Shop credential records.
//!
//! A [`ShopCredential`] is everything needed to sign and authenticate a call
//! on behalf of one connected shop. Access and refresh tokens live together
//! in a [`TokenPair`] so they can only ever be replaced as a unit.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{AccessToken, AppKey, AppSecret, RefreshToken, ShopCipher};

/// Marketplace a shop record belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    /// TikTok Shop.
    #[default]
    Tiktok,
    /// Etsy (records only; no client in this crate).
    Etsy,
}

/// Administrative status of a shop record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopStatus {
    /// Shop is connected and usable.
    #[default]
    Active,
    /// Shop has been disabled by an administrator.
    Inactive,
}

/// How a caller names a shop when asking for its credentials.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShopIdentifier {
    /// Platform-assigned shop id.
    Id(String),
    /// Human-readable shop name.
    Name(String),
}

impl ShopIdentifier {
    /// Shorthand for [`ShopIdentifier::Id`].
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Shorthand for [`ShopIdentifier::Name`].
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Returns `true` if `credential` is the shop this identifier names.
    #[must_use]
    pub fn matches(&self, credential: &ShopCredential) -> bool {
        match self {
            Self::Id(id) => credential.shop_id == *id,
            Self::Name(name) => credential.shop_name == *name,
        }
    }
}

impl fmt::Display for ShopIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "shop id '{id}'"),
            Self::Name(name) => write!(f, "shop name '{name}'"),
        }
    }
}

/// An access/refresh token pair as issued by the token service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Token sent with every open API call.
    pub access_token: AccessToken,
    /// Token used to obtain the next pair.
    pub refresh_token: RefreshToken,
    /// When the access token stops being accepted, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_expires_at: Option<DateTime<Utc>>,
    /// When the refresh token stops being accepted, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

impl TokenPair {
    /// Creates a pair with no known expiry.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken::new(access_token),
            refresh_token: RefreshToken::new(refresh_token),
            access_token_expires_at: None,
            refresh_token_expires_at: None,
        }
    }

    /// Returns `true` if the access token's expiry has passed.
    ///
    /// Pairs without an expiry are considered never expired.
    #[must_use]
    pub fn access_token_expired(&self) -> bool {
        self.access_token_expires_at
            .is_some_and(|expires| Utc::now() >= expires)
    }

    /// Returns `true` if the access token expires within `margin`.
    #[must_use]
    pub fn expires_within(&self, margin: Duration) -> bool {
        self.access_token_expires_at
            .is_some_and(|expires| Utc::now() + margin >= expires)
    }
}

/// Where a shop is in the authorization lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
    /// No token pair has been issued yet.
    Unauthorized,
    /// A token pair is present and not known to be expired.
    Authorized,
    /// The access token has expired and needs a refresh.
    Stale,
}

/// One connected marketplace shop.
///
/// `Debug` output never contains the app secret or tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopCredential {
    /// Marketplace this shop belongs to.
    #[serde(default)]
    pub platform: Platform,
    /// Platform-assigned shop id.
    pub shop_id: String,
    /// Human-readable shop name.
    pub shop_name: String,
    /// Platform-assigned shop code, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_code: Option<String>,
    /// App key the shop authorized.
    pub app_key: AppKey,
    /// App secret paired with `app_key`.
    pub app_secret: AppSecret,
    /// Current token pair, if the shop has completed authorization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenPair>,
    /// Shop cipher required by most endpoint families.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher: Option<ShopCipher>,
    /// Administrative status.
    #[serde(default)]
    pub status: ShopStatus,
}

impl ShopCredential {
    /// Creates an unauthorized record for a provisioned app.
    #[must_use]
    pub fn new(
        shop_id: impl Into<String>,
        shop_name: impl Into<String>,
        app_key: AppKey,
        app_secret: AppSecret,
    ) -> Self {
        Self {
            platform: Platform::Tiktok,
            shop_id: shop_id.into(),
            shop_name: shop_name.into(),
            shop_code: None,
            app_key,
            app_secret,
            tokens: None,
            cipher: None,
            status: ShopStatus::Active,
        }
    }

    /// Sets the token pair.
    #[must_use]
    pub fn with_tokens(mut self, tokens: TokenPair) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sets the shop cipher.
    #[must_use]
    pub fn with_cipher(mut self, cipher: impl Into<String>) -> Self {
        self.cipher = Some(ShopCipher::new(cipher));
        self
    }

    /// Returns the access token, if the shop is authorized.
    #[must_use]
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.tokens
            .as_ref()
            .map(|t| &t.access_token)
            .filter(|t| !t.is_empty())
    }

    /// Returns the refresh token, if one is stored.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.tokens
            .as_ref()
            .map(|t| &t.refresh_token)
            .filter(|t| !t.is_empty())
    }

    /// Returns the shop cipher, if one is stored.
    #[must_use]
    pub fn shop_cipher(&self) -> Option<&ShopCipher> {
        self.cipher.as_ref().filter(|c| !c.is_empty())
    }

    /// Reports where this shop is in the authorization lifecycle.
    #[must_use]
    pub fn token_state(&self) -> TokenState {
        match &self.tokens {
            None => TokenState::Unauthorized,
            Some(tokens) if tokens.access_token.is_empty() => TokenState::Unauthorized,
            Some(tokens) if tokens.access_token_expired() => TokenState::Stale,
            Some(_) => TokenState::Authorized,
        }
    }

    /// Returns `true` if the record is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ShopStatus::Active
    }
}

// Verify ShopCredential is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopCredential>();
};
