//! Credential providers and stores.
//!
//! Every platform call re-fetches the shop's credentials through a
//! [`CredentialProvider`]; nothing is cached between calls, so a token pair
//! rotated by a concurrent refresh is picked up by the very next request.
//!
//! # Implementations
//!
//! - [`InMemoryCredentialStore`]: a read/write store for tests, tools and
//!   single-process deployments
//! - [`RemoteCredentialLookup`]: a read-only client for an HTTP lookup service
//!   that serves shop documents as JSON
//!
//! Callers hold an `Arc<dyn CredentialProvider>` (or `Arc<dyn CredentialStore>`)
//! and never depend on which implementation is behind it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::auth::credential::{Platform, ShopCredential, ShopIdentifier, ShopStatus, TokenPair};
use crate::auth::error::CredentialError;
use crate::clients::{HttpError, HttpResponseError};
use crate::config::{
    AccessToken, AppKey, AppSecret, BaseUrl, RefreshToken, ShopCipher, DEFAULT_METADATA_TIMEOUT,
};

/// Read access to shop credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the current credentials of the shop named by `shop`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotFound`] for an unknown shop, or another
    /// [`CredentialError`] if the backing store fails.
    async fn get_credentials(&self, shop: &ShopIdentifier) -> Result<ShopCredential, CredentialError>;
}

/// Read/write access to shop credentials.
///
/// Only the token lifecycle writes token fields, and it does so exclusively
/// through [`replace_tokens`](Self::replace_tokens), which swaps both tokens
/// in one update.
#[async_trait]
pub trait CredentialStore: CredentialProvider {
    /// Inserts a record, or replaces the record with the same shop id.
    async fn upsert(&self, credential: ShopCredential) -> Result<(), CredentialError>;

    /// Atomically replaces the token pair of the shop with `shop_id` and
    /// returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotFound`] if no record has that id.
    async fn replace_tokens(
        &self,
        shop_id: &str,
        tokens: TokenPair,
    ) -> Result<ShopCredential, CredentialError>;

    /// Deletes a record. Returns `true` if one was removed.
    async fn delete(&self, shop: &ShopIdentifier) -> Result<bool, CredentialError>;

    /// Returns every stored record.
    async fn list(&self) -> Result<Vec<ShopCredential>, CredentialError>;
}

/// Thread-safe in-memory credential store keyed by shop id.
///
/// Cloning is cheap; clones share the same records.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCredentialStore {
    shops: Arc<RwLock<HashMap<String, ShopCredential>>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `credentials`.
    #[must_use]
    pub fn with_credentials(credentials: impl IntoIterator<Item = ShopCredential>) -> Self {
        let shops = credentials
            .into_iter()
            .map(|c| (c.shop_id.clone(), c))
            .collect();
        Self {
            shops: Arc::new(RwLock::new(shops)),
        }
    }
}

#[async_trait]
impl CredentialProvider for InMemoryCredentialStore {
    async fn get_credentials(&self, shop: &ShopIdentifier) -> Result<ShopCredential, CredentialError> {
        let shops = self.shops.read().await;
        let found = match shop {
            ShopIdentifier::Id(id) => shops.get(id),
            ShopIdentifier::Name(_) => shops.values().find(|c| shop.matches(c)),
        };
        found.cloned().ok_or_else(|| CredentialError::NotFound {
            identifier: shop.clone(),
        })
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn upsert(&self, credential: ShopCredential) -> Result<(), CredentialError> {
        self.shops
            .write()
            .await
            .insert(credential.shop_id.clone(), credential);
        Ok(())
    }

    async fn replace_tokens(
        &self,
        shop_id: &str,
        tokens: TokenPair,
    ) -> Result<ShopCredential, CredentialError> {
        let mut shops = self.shops.write().await;
        let credential = shops
            .get_mut(shop_id)
            .ok_or_else(|| CredentialError::NotFound {
                identifier: ShopIdentifier::id(shop_id),
            })?;
        credential.tokens = Some(tokens);
        Ok(credential.clone())
    }

    async fn delete(&self, shop: &ShopIdentifier) -> Result<bool, CredentialError> {
        let mut shops = self.shops.write().await;
        let key = match shop {
            ShopIdentifier::Id(id) => Some(id.clone()),
            ShopIdentifier::Name(_) => shops
                .values()
                .find(|c| shop.matches(c))
                .map(|c| c.shop_id.clone()),
        };
        Ok(key.and_then(|k| shops.remove(&k)).is_some())
    }

    async fn list(&self) -> Result<Vec<ShopCredential>, CredentialError> {
        Ok(self.shops.read().await.values().cloned().collect())
    }
}

/// Path of the shop lookup endpoint on the lookup service.
pub const LOOKUP_PATH: &str = "/get-tts";

/// Read-only credential provider backed by an HTTP lookup service.
///
/// The service answers `GET {base}/get-tts?shop_name=...` (or `?shop_id=...`)
/// with a JSON array of shop documents. An empty array means the shop is
/// unknown.
#[derive(Clone, Debug)]
pub struct RemoteCredentialLookup {
    client: reqwest::Client,
    base_url: BaseUrl,
    timeout: Duration,
}

impl RemoteCredentialLookup {
    /// Creates a lookup client with the default 10 second timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn new(base_url: BaseUrl) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url,
            timeout: DEFAULT_METADATA_TIMEOUT,
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_documents(&self, shop: &ShopIdentifier) -> Result<Vec<ShopDocument>, HttpError> {
        let (key, value) = match shop {
            ShopIdentifier::Id(id) => ("shop_id", id.as_str()),
            ShopIdentifier::Name(name) => ("shop_name", name.as_str()),
        };

        tracing::debug!(%shop, "Looking up shop credentials");

        let response = self
            .client
            .get(self.base_url.join_path(LOOKUP_PATH))
            .query(&[(key, value)])
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(e, self.timeout))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::from_reqwest(e, self.timeout))?;

        if !(200..300).contains(&status) {
            return Err(HttpResponseError {
                status,
                message: text,
            }
            .into());
        }

        serde_json::from_str(&text).map_err(|e| HttpError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CredentialProvider for RemoteCredentialLookup {
    async fn get_credentials(&self, shop: &ShopIdentifier) -> Result<ShopCredential, CredentialError> {
        let documents = self.fetch_documents(shop).await?;
        let document = documents
            .into_iter()
            .next()
            .ok_or_else(|| CredentialError::NotFound {
                identifier: shop.clone(),
            })?;
        document.try_into()
    }
}

/// A shop document as served by the lookup service.
#[derive(Deserialize)]
struct ShopDocument {
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    shop_id: Option<String>,
    #[serde(default)]
    shop_code: Option<String>,
    #[serde(default)]
    shop_name: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    cipher: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "appKey", alias = "app_key")]
    app_key: Option<String>,
    #[serde(default, rename = "appSecret", alias = "app_secret")]
    app_secret: Option<String>,
}

impl TryFrom<ShopDocument> for ShopCredential {
    type Error = CredentialError;

    fn try_from(doc: ShopDocument) -> Result<Self, Self::Error> {
        let shop_name = doc.shop_name.unwrap_or_default();
        let shop = if shop_name.is_empty() {
            doc.shop_id.clone().unwrap_or_default()
        } else {
            shop_name.clone()
        };
        let incomplete = |field: &'static str| CredentialError::Incomplete {
            shop: shop.clone(),
            field,
        };

        let app_key = doc
            .app_key
            .and_then(|k| AppKey::new(k).ok())
            .ok_or_else(|| incomplete("an app key"))?;
        let app_secret = doc
            .app_secret
            .and_then(|s| AppSecret::new(s).ok())
            .ok_or_else(|| incomplete("an app secret"))?;
        let shop_id = doc
            .shop_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| incomplete("a shop id"))?;

        let tokens = doc.access_token.filter(|t| !t.is_empty()).map(|access| TokenPair {
            access_token: AccessToken::new(access),
            refresh_token: RefreshToken::new(doc.refresh_token.unwrap_or_default()),
            access_token_expires_at: None,
            refresh_token_expires_at: None,
        });

        // The lookup path serves TikTok shops, so a document without a
        // platform is a TikTok shop. Only an explicit "etsy" says otherwise.
        let platform = match doc.platform.as_deref() {
            Some(p) if p.eq_ignore_ascii_case("etsy") => Platform::Etsy,
            _ => Platform::Tiktok,
        };
        let status = match doc.status.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("inactive") => ShopStatus::Inactive,
            _ => ShopStatus::Active,
        };

        Ok(Self {
            platform,
            shop_id,
            shop_name,
            shop_code: doc.shop_code.filter(|c| !c.is_empty()),
            app_key,
            app_secret,
            tokens,
            cipher: doc.cipher.filter(|c| !c.is_empty()).map(ShopCipher::new),
            status,
        })
    }
}
