//! Request signing for the TikTok Shop open API.
//!
//! Every open API call carries a `sign` query parameter computed from the
//! request path, its query parameters and (for calls with a JSON body) the
//! body itself. The canonical string is built as follows:
//!
//! 1. Drop the `sign` and `access_token` parameters.
//! 2. Sort the remaining keys by code point.
//! 3. Concatenate `key + value` for each key, without separators.
//! 4. Prepend the request path.
//! 5. Append the compact JSON body if it is a non-empty object.
//! 6. Wrap the result as `secret + string + secret`.
//!
//! The signature is the lowercase hex HMAC-SHA256 of the wrapped string keyed
//! by the app secret. Values must be signed exactly as they are later written
//! to the URL, which is why [`SignedRequest`](crate::clients::SignedRequest)
//! stores every query value as its final string.
//!
//! # Example
//!
//! ```rust
//! use tiktok_shop_api::auth::signature::sign;
//!
//! let queries = [("app_key", "k1"), ("timestamp", "1700000000")];
//! let signature = sign("/authorization/202309/shops", queries, "s1", None);
//! assert_eq!(signature.len(), 64);
//! ```

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Query keys that never participate in the signed material.
pub const EXCLUDED_KEYS: [&str; 2] = ["sign", "access_token"];

/// Computes the request signature.
///
/// `queries` may be any collection of key/value pairs; insertion order does
/// not matter because keys are sorted before concatenation. Keys listed in
/// [`EXCLUDED_KEYS`] are ignored. A `body` that is not a non-empty JSON object
/// is ignored as well.
#[must_use]
pub fn sign<I, K, V>(
    path: &str,
    queries: I,
    secret: &str,
    body: Option<&serde_json::Value>,
) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let body = body.and_then(signable_body);
    sign_serialized(path, queries, secret, body.as_deref())
}

/// Computes the signature over an already-serialized body.
///
/// Used by the transport so the exact bytes placed on the wire are the bytes
/// that were signed. An empty string or `{}` counts as "no body".
#[must_use]
pub fn sign_serialized<I, K, V>(path: &str, queries: I, secret: &str, body: Option<&str>) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let canonical = canonical_string(path, queries, body);
    let wrapped = format!("{secret}{canonical}{secret}");
    compute_signature(&wrapped, secret)
}

/// Builds the unwrapped canonical string: path, sorted `key + value` pairs, body.
#[must_use]
pub fn canonical_string<I, K, V>(path: &str, queries: I, body: Option<&str>) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = queries
        .into_iter()
        .filter(|(key, _)| !EXCLUDED_KEYS.contains(&key.as_ref()))
        .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
        .collect();

    let mut canonical = String::from(path);
    for (key, value) in &sorted {
        canonical.push_str(key);
        canonical.push_str(value);
    }

    if let Some(body) = body.filter(|b| !b.is_empty() && *b != "{}") {
        canonical.push_str(body);
    }

    canonical
}

/// Serializes a body for signing, or returns `None` if it must not be signed.
///
/// Only non-empty objects are signed. Field order is preserved as provided.
#[must_use]
pub fn signable_body(body: &serde_json::Value) -> Option<String> {
    body.as_object()
        .filter(|map| !map.is_empty())
        .map(|_| body.to_string())
}

/// Computes a lowercase hex HMAC-SHA256 of `message` keyed by `secret`.
///
/// # Example
///
/// ```rust
/// use tiktok_shop_api::auth::signature::compute_signature;
///
/// let sig = compute_signature("message", "key");
/// assert_eq!(sig, "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a");
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Performs constant-time comparison of two strings.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Checks a received `sign` value against the signature recomputed locally.
///
/// Useful for verifying signed callbacks and for asserting on captured
/// requests in tests.
#[must_use]
pub fn verify_signature<I, K, V>(
    path: &str,
    queries: I,
    secret: &str,
    body: Option<&str>,
    received: &str,
) -> bool
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let expected = sign_serialized(path, queries, secret, body);
    constant_time_compare(&expected, &received.to_ascii_lowercase())
}

mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}
