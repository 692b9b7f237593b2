//! Token lifecycle: code exchange, refresh and shop authorization.
//!
//! # Overview
//!
//! - [`TokenManager::exchange_authorization_code`]: one-shot code exchange
//! - [`TokenManager::refresh_access_token`]: single-flight refresh per shop
//! - [`TokenManager::fetch_authorized_shops`]: shops (and ciphers) a token grants
//! - [`TokenManager::authorize_shop`]: exchange, fetch the cipher and persist
//!
//! # Refresh Flow
//!
//! Refreshes are never triggered by the platform client. A caller (operator
//! action or a scheduled job) decides a shop is stale and calls
//! [`refresh_access_token`](TokenManager::refresh_access_token):
//!
//! 1. The per-shop lock is taken; concurrent refreshes of one shop queue here
//! 2. The stored record is re-read under the lock
//! 3. If its refresh token no longer matches the caller's snapshot and its
//!    access token has not expired, another refresh already rotated the pair
//!    and the stored access token is returned
//! 4. Otherwise the token service is called and the new pair is persisted
//!    with a single [`CredentialStore::replace_tokens`] call
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tiktok_shop_api::auth::{InMemoryCredentialStore, ShopIdentifier, TokenManager};
//! use tiktok_shop_api::clients::SignedHttpClient;
//!
//! let store = Arc::new(InMemoryCredentialStore::new());
//! let tokens = TokenManager::new(SignedHttpClient::new(config), store.clone());
//!
//! let shop = tokens.authorize_shop(&code, app_key, app_secret).await?;
//! let fresh = tokens.refresh_access_token(&shop).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::auth::credential::{ShopCredential, ShopIdentifier, ShopStatus, TokenPair, TokenState};
use crate::auth::error::TokenError;
use crate::auth::store::CredentialStore;
use crate::clients::{HttpError, HttpMethod, PlatformResponse, SignedHttpClient, SignedRequest};
use crate::config::{AccessToken, ApiVersion, AppKey, AppSecret, RefreshToken, ShopCipher};

/// Token service path for the authorization-code exchange.
pub const TOKEN_GET_PATH: &str = "/api/v2/token/get";

/// Token service path for refreshing a token pair.
pub const TOKEN_REFRESH_PATH: &str = "/api/v2/token/refresh";

/// A shop granted to the app by an access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedShop {
    /// Platform shop id.
    pub id: String,
    /// Platform shop code.
    #[serde(default)]
    pub code: String,
    /// Shop name.
    #[serde(default)]
    pub name: String,
    /// Shop cipher for order, fulfillment and finance calls.
    pub cipher: ShopCipher,
    /// Selling region (e.g. "US").
    #[serde(default)]
    pub region: String,
}

#[derive(Deserialize)]
struct TokenData {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    access_token_expire_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    refresh_token_expire_in: Option<i64>,
}

impl TokenData {
    /// Returns the pair if both tokens are present and non-empty.
    fn into_pair(self) -> Option<TokenPair> {
        let access = self.access_token.filter(|t| !t.is_empty())?;
        let refresh = self.refresh_token.filter(|t| !t.is_empty())?;
        Some(TokenPair {
            access_token: AccessToken::new(access),
            refresh_token: RefreshToken::new(refresh),
            access_token_expires_at: self.access_token_expire_in.and_then(expiry_instant),
            refresh_token_expires_at: self.refresh_token_expire_in.and_then(expiry_instant),
        })
    }
}

// The token service reports expiries as Unix timestamps in seconds.
fn expiry_instant(seconds: i64) -> Option<DateTime<Utc>> {
    (seconds > 0)
        .then(|| DateTime::from_timestamp(seconds, 0))
        .flatten()
}

#[derive(Deserialize)]
struct ShopsData {
    #[serde(default)]
    shops: Vec<AuthorizedShop>,
}

/// Manages token exchange and refresh against a credential store.
///
/// The manager is the only component that writes token fields. Share one
/// instance (behind an `Arc`) across tasks so the per-shop refresh locks
/// actually serialize concurrent refreshes.
pub struct TokenManager {
    http: SignedHttpClient,
    store: Arc<dyn CredentialStore>,
    refresh_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

// Verify TokenManager is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenManager>();
};

impl TokenManager {
    /// Creates a manager writing to `store`.
    #[must_use]
    pub fn new(http: SignedHttpClient, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            http,
            store,
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the credential store this manager writes to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// Nothing is persisted; see [`authorize_shop`](Self::authorize_shop) for
    /// the full connect-a-shop flow.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::AuthExchange`] on a transport failure, a non-zero
    /// platform code or a response missing either token.
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        app_key: &AppKey,
        app_secret: &AppSecret,
    ) -> Result<TokenPair, TokenError> {
        let response = self
            .http
            .get_token_endpoint(
                TOKEN_GET_PATH,
                &[
                    ("app_key", app_key.as_ref()),
                    ("auth_code", code),
                    ("app_secret", app_secret.as_ref()),
                    ("grant_type", "authorized_code"),
                ],
            )
            .await
            .map_err(|e| TokenError::AuthExchange {
                status: e.status().unwrap_or(0),
                code: 0,
                message: e.to_string(),
            })?;

        if !response.is_success() {
            tracing::warn!(
                code = response.code,
                request_id = response.request_id.as_deref(),
                "Authorization code exchange rejected"
            );
            return Err(TokenError::AuthExchange {
                status: response.status,
                code: response.code,
                message: response.message,
            });
        }

        let status = response.status;
        token_pair(response).ok_or_else(|| TokenError::AuthExchange {
            status,
            code: 0,
            message: "token response is missing access_token or refresh_token".to_string(),
        })
    }

    /// Refreshes the token pair of `shop` and returns the new access token.
    ///
    /// `shop` is the caller's snapshot. If the stored refresh token differs
    /// from it and the stored access token is still live, a concurrent
    /// refresh already rotated the pair and the stored access token is
    /// returned without contacting the platform. A stored pair that has
    /// gone stale is always refreshed, whatever the snapshot holds.
    ///
    /// # Errors
    ///
    /// - [`TokenError::NoRefreshToken`] if no refresh token is stored
    /// - [`TokenError::RefreshHttp`] on a transport failure
    /// - [`TokenError::RefreshApi`] on a non-zero code or an incomplete pair
    /// - [`TokenError::Credential`] if the store cannot be read or written
    pub async fn refresh_access_token(
        &self,
        shop: &ShopCredential,
    ) -> Result<AccessToken, TokenError> {
        let snapshot = shop.refresh_token().cloned();

        let lock = self.lock_for(&shop.shop_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.refresh_locked(&shop.shop_id, snapshot.as_ref()).await
        };
        self.release_lock(&shop.shop_id, lock).await;
        result
    }

    async fn refresh_locked(
        &self,
        shop_id: &str,
        snapshot: Option<&RefreshToken>,
    ) -> Result<AccessToken, TokenError> {
        let current = self
            .store
            .get_credentials(&ShopIdentifier::id(shop_id))
            .await?;

        let Some(refresh_token) = current.refresh_token() else {
            tracing::warn!(shop = %current.shop_name, "Token refresh skipped: no refresh token");
            return Err(TokenError::NoRefreshToken {
                shop: current.shop_name.clone(),
            });
        };

        // A rotated pair is only reused while its access token is still live.
        if snapshot != Some(refresh_token) && current.token_state() == TokenState::Authorized {
            if let Some(access_token) = current.access_token() {
                tracing::debug!(
                    shop = %current.shop_name,
                    "Token pair already rotated by a concurrent refresh"
                );
                return Ok(access_token.clone());
            }
        }

        let pair = self.request_refresh(&current, refresh_token).await?;
        let access_token = pair.access_token.clone();
        self.store.replace_tokens(&current.shop_id, pair).await?;

        tracing::info!(shop = %current.shop_name, "Token refreshed");
        Ok(access_token)
    }

    async fn request_refresh(
        &self,
        shop: &ShopCredential,
        refresh_token: &RefreshToken,
    ) -> Result<TokenPair, TokenError> {
        let response = self
            .http
            .get_token_endpoint(
                TOKEN_REFRESH_PATH,
                &[
                    ("app_key", shop.app_key.as_ref()),
                    ("app_secret", shop.app_secret.as_ref()),
                    ("refresh_token", refresh_token.as_ref()),
                    ("grant_type", "refresh_token"),
                ],
            )
            .await
            .map_err(|e| {
                tracing::warn!(shop = %shop.shop_name, error = %e, "Token refresh failed");
                TokenError::RefreshHttp(e)
            })?;

        if !response.is_success() {
            tracing::warn!(
                shop = %shop.shop_name,
                code = response.code,
                request_id = response.request_id.as_deref(),
                "Token refresh rejected"
            );
            return Err(TokenError::RefreshApi {
                code: response.code,
                message: response.message,
            });
        }

        token_pair(response).ok_or_else(|| TokenError::RefreshApi {
            code: 0,
            message: "refresh response is missing access_token or refresh_token".to_string(),
        })
    }

    async fn lock_for(&self, shop_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.refresh_locks.lock().await;
        Arc::clone(locks.entry(shop_id.to_string()).or_default())
    }

    /// Drops the shop's lock entry once no other refresh holds or awaits it.
    async fn release_lock(&self, shop_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.refresh_locks.lock().await;
        // One reference lives in the map, the other is `lock`.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(shop_id);
        }
    }

    /// Lists the shops an access token is authorized for.
    ///
    /// The token exchange does not return the shop cipher; this call is how
    /// it is obtained.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ShopLookup`] on a transport failure or a
    /// non-zero platform code.
    pub async fn fetch_authorized_shops(
        &self,
        access_token: &AccessToken,
        app_key: &AppKey,
        app_secret: &AppSecret,
    ) -> Result<Vec<AuthorizedShop>, TokenError> {
        let shop_lookup = |message: String| TokenError::ShopLookup { message };

        let request = SignedRequest::builder(
            HttpMethod::Get,
            ApiVersion::V202309.path("authorization", "shops"),
        )
        .sign(app_key, app_secret)
        .map_err(|e| shop_lookup(e.to_string()))?;

        let response = self
            .http
            .send(&request, Some(access_token))
            .await
            .map_err(|e: HttpError| shop_lookup(e.to_string()))?;

        if !response.is_success() {
            return Err(shop_lookup(format!(
                "code {}: {}",
                response.code, response.message
            )));
        }

        serde_json::from_value::<ShopsData>(response.data)
            .map(|data| data.shops)
            .map_err(|e| shop_lookup(e.to_string()))
    }

    /// Connects a shop: exchanges `code`, fetches the first authorized shop
    /// and upserts a complete, active credential record.
    ///
    /// # Errors
    ///
    /// Propagates exchange and lookup failures; returns
    /// [`TokenError::ShopLookup`] if the token grants no shop.
    pub async fn authorize_shop(
        &self,
        code: &str,
        app_key: AppKey,
        app_secret: AppSecret,
    ) -> Result<ShopCredential, TokenError> {
        let tokens = self
            .exchange_authorization_code(code, &app_key, &app_secret)
            .await?;
        let shops = self
            .fetch_authorized_shops(&tokens.access_token, &app_key, &app_secret)
            .await?;
        let shop = shops.into_iter().next().ok_or_else(|| TokenError::ShopLookup {
            message: "access token grants no shops".to_string(),
        })?;

        let mut credential = ShopCredential::new(shop.id, shop.name, app_key, app_secret)
            .with_tokens(tokens);
        credential.shop_code = Some(shop.code).filter(|c| !c.is_empty());
        credential.cipher = Some(shop.cipher);
        credential.status = ShopStatus::Active;

        self.store.upsert(credential.clone()).await?;
        tracing::info!(shop = %credential.shop_name, "Shop authorized");
        Ok(credential)
    }
}

fn token_pair(response: PlatformResponse) -> Option<TokenPair> {
    serde_json::from_value::<TokenData>(response.data)
        .ok()
        .and_then(TokenData::into_pair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_data_requires_both_tokens() {
        let data: TokenData =
            serde_json::from_value(json!({"access_token": "a", "refresh_token": ""})).unwrap();
        assert!(data.into_pair().is_none());

        let data: TokenData = serde_json::from_value(json!({"refresh_token": "r"})).unwrap();
        assert!(data.into_pair().is_none());
    }

    #[test]
    fn test_token_data_records_expiry_instants() {
        let data: TokenData = serde_json::from_value(json!({
            "access_token": "a",
            "access_token_expire_in": 1_700_000_000,
            "refresh_token": "r",
            "refresh_token_expire_in": 0
        }))
        .unwrap();
        let pair = data.into_pair().unwrap();

        assert_eq!(
            pair.access_token_expires_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert!(pair.refresh_token_expires_at.is_none());
        assert!(pair.access_token_expired());
    }

    #[test]
    fn test_authorized_shop_deserializes() {
        let shops: ShopsData = serde_json::from_value(json!({
            "shops": [{
                "id": "7495",
                "code": "USLC1",
                "name": "Baby Shop",
                "cipher": "ROW_c",
                "region": "US",
                "seller_type": "CROSS_BORDER"
            }]
        }))
        .unwrap();
        assert_eq!(shops.shops.len(), 1);
        assert_eq!(shops.shops[0].cipher.as_ref(), "ROW_c");
    }

    #[tokio::test]
    async fn test_refresh_lock_entry_is_dropped_after_refresh() {
        use crate::auth::store::InMemoryCredentialStore;
        use crate::config::ClientConfig;

        let unauthorized = ShopCredential::new(
            "7495",
            "Baby Shop",
            AppKey::new("k1").unwrap(),
            AppSecret::new("s1").unwrap(),
        );
        let store = InMemoryCredentialStore::with_credentials([unauthorized.clone()]);
        let manager = TokenManager::new(
            SignedHttpClient::new(ClientConfig::default()),
            Arc::new(store),
        );

        let result = manager.refresh_access_token(&unauthorized).await;

        assert!(matches!(result, Err(TokenError::NoRefreshToken { .. })));
        assert!(manager.refresh_locks.lock().await.is_empty());
    }
}
