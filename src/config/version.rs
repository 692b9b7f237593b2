//! TikTok Shop API version definitions.
//!
//! The open API versions each endpoint family independently: the version
//! appears both as a path segment (`/order/202507/orders`) and, for most
//! calls, as the `version` query parameter. Each platform operation in
//! [`crate::api`] is bound to exactly one [`ApiVersion`].

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// TikTok Shop API version.
///
/// # Example
///
/// ```rust
/// use tiktok_shop_api::ApiVersion;
///
/// let version: ApiVersion = "202507".parse().unwrap();
/// assert_eq!(version, ApiVersion::V202507);
/// assert_eq!(version.to_string(), "202507");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiVersion {
    /// API version 202309 (authorization, fulfillment, finance, order search).
    V202309,
    /// API version 202507 (order detail).
    V202507,
}

impl ApiVersion {
    /// Returns the version string used in paths and the `version` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V202309 => "202309",
            Self::V202507 => "202507",
        }
    }

    /// Builds a versioned endpoint path, e.g. `("order", "orders")` -> `/order/202507/orders`.
    #[must_use]
    pub fn path(self, family: &str, rest: &str) -> String {
        format!("/{family}/{}/{}", self.as_str(), rest.trim_start_matches('/'))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "202309" => Ok(Self::V202309),
            "202507" => Ok(Self::V202507),
            other => Err(ConfigError::InvalidApiVersion {
                version: other.to_string(),
            }),
        }
    }
}
