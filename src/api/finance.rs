//! Finance operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::client::{page_size, Endpoint, PlatformClient};
use crate::api::envelope::PlatformOperationResult;
use crate::api::errors::ApiError;
use crate::auth::ShopIdentifier;
use crate::config::ApiVersion;

/// Sort field used when none is given.
pub const DEFAULT_STATEMENT_SORT_FIELD: &str = "statement_time";

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

/// Parameters for [`PlatformClient::list_statements`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementListParams {
    /// Sort field; defaults to `statement_time`.
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
    /// Sort direction; the platform default applies when absent.
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
    /// Page size, 1 to 100.
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Opaque token from the previous page's `next_page_token`.
    #[serde(default)]
    pub page_token: Option<String>,
    /// Inclusive lower bound on statement time (Unix seconds).
    #[serde(default)]
    pub statement_time_ge: Option<i64>,
    /// Exclusive upper bound on statement time (Unix seconds).
    #[serde(default)]
    pub statement_time_lt: Option<i64>,
}

fn default_sort_field() -> String {
    DEFAULT_STATEMENT_SORT_FIELD.to_string()
}

impl Default for StatementListParams {
    fn default() -> Self {
        Self {
            sort_field: default_sort_field(),
            sort_order: None,
            page_size: None,
            page_token: None,
            statement_time_ge: None,
            statement_time_lt: None,
        }
    }
}

impl StatementListParams {
    pub(crate) fn endpoint(&self) -> Result<Endpoint, ApiError> {
        if let (Some(ge), Some(lt)) = (self.statement_time_ge, self.statement_time_lt) {
            if ge >= lt {
                return Err(ApiError::validation(
                    "statement_time_ge must be before statement_time_lt",
                ));
            }
        }
        let sort_field = match self.sort_field.trim() {
            "" => DEFAULT_STATEMENT_SORT_FIELD,
            other => other,
        };

        Ok(Endpoint::get(ApiVersion::V202309, "finance", "statements")
            .query("sort_field", sort_field)
            .query_opt("sort_order", self.sort_order)
            .query_opt("page_size", page_size(self.page_size)?)
            .query_opt(
                "page_token",
                self.page_token.as_deref().filter(|t| !t.is_empty()),
            )
            .query_opt("statement_time_ge", self.statement_time_ge)
            .query_opt("statement_time_lt", self.statement_time_lt))
    }
}

impl PlatformClient {
    /// Lists settlement statements, one page at a time.
    pub async fn list_statements(
        &self,
        shop: &ShopIdentifier,
        params: &StatementListParams,
    ) -> PlatformOperationResult {
        self.run(shop, params.endpoint()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_statement_time() {
        let endpoint = StatementListParams::default().endpoint().unwrap();
        assert_eq!(endpoint.path(), "/finance/202309/statements");
        assert_eq!(endpoint.query_value("sort_field"), Some("statement_time"));
        assert_eq!(endpoint.query_value("page_size"), None);
    }

    #[test]
    fn test_optional_fields_are_sent_when_set() {
        let params = StatementListParams {
            sort_order: Some(SortOrder::Desc),
            page_size: Some(10),
            page_token: Some("p2".to_string()),
            statement_time_ge: Some(1_700_000_000),
            ..StatementListParams::default()
        };
        let endpoint = params.endpoint().unwrap();
        assert_eq!(endpoint.query_value("sort_order"), Some("DESC"));
        assert_eq!(endpoint.query_value("page_size"), Some("10"));
        assert_eq!(endpoint.query_value("page_token"), Some("p2"));
        assert_eq!(endpoint.query_value("statement_time_ge"), Some("1700000000"));
    }

    #[test]
    fn test_rejects_inverted_range_and_bad_page_size() {
        let inverted = StatementListParams {
            statement_time_ge: Some(20),
            statement_time_lt: Some(10),
            ..StatementListParams::default()
        };
        assert!(inverted.endpoint().is_err());

        let oversized = StatementListParams {
            page_size: Some(500),
            ..StatementListParams::default()
        };
        assert!(oversized.endpoint().is_err());
    }

    #[test]
    fn test_deserializes_empty_object_with_defaults() {
        let params: StatementListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, StatementListParams::default());
    }
}
