//! Order operations: detail lookup, search and tracking.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::{page_size, path_segment, Endpoint, PlatformClient};
use crate::api::envelope::PlatformOperationResult;
use crate::api::errors::ApiError;
use crate::auth::ShopIdentifier;
use crate::config::ApiVersion;

/// Most order ids accepted by one order-detail call.
pub const MAX_ORDER_IDS: usize = 50;

/// Default page size for order search.
pub const DEFAULT_ORDER_PAGE_SIZE: u32 = 20;

/// Parameters for [`PlatformClient::get_order_detail`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailParams {
    /// Order ids to look up; between 1 and [`MAX_ORDER_IDS`].
    pub order_ids: Vec<String>,
}

impl OrderDetailParams {
    /// Creates parameters for the given ids.
    pub fn new<I, S>(order_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order_ids: order_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn endpoint(&self) -> Result<Endpoint, ApiError> {
        if self.order_ids.is_empty() {
            return Err(ApiError::validation("at least one order id is required"));
        }
        if self.order_ids.len() > MAX_ORDER_IDS {
            return Err(ApiError::TooManyIds {
                count: self.order_ids.len(),
                max: MAX_ORDER_IDS,
            });
        }
        let ids = self
            .order_ids
            .iter()
            .map(|id| path_segment("order id", id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Endpoint::get(ApiVersion::V202507, "order", "orders").query("ids", ids.join(",")))
    }
}

/// How search filters travel on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSearchStyle {
    /// Filters and `cursor` in the query string.
    #[default]
    QueryFilters,
    /// Filters in a signed JSON body; `page_size` and `page_token` in the query.
    BodyFilters,
}

/// Parameters for [`PlatformClient::search_orders`].
///
/// Either a complete time range or an `order_status` is required.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSearchParams {
    /// Wire shape of the filters.
    #[serde(default)]
    pub style: OrderSearchStyle,
    /// Inclusive lower bound on order creation time (Unix seconds).
    pub start_time: Option<i64>,
    /// Exclusive upper bound on order creation time (Unix seconds).
    pub end_time: Option<i64>,
    /// Order status filter (e.g. `AWAITING_SHIPMENT`).
    pub order_status: Option<String>,
    /// Delivery option filter.
    pub delivery_option_type: Option<String>,
    /// Buyer filter.
    pub buyer_user_id: Option<String>,
    /// Page size, 1 to 100; defaults to 20.
    pub page_size: Option<u32>,
    /// Opaque token from the previous page's `next_page_token`.
    pub page_token: Option<String>,
}

impl OrderSearchParams {
    /// Creates parameters for orders created in `[start_time, end_time)`.
    #[must_use]
    pub fn created_between(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..Self::default()
        }
    }

    /// Creates parameters for orders in `status`.
    #[must_use]
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            order_status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Sets the page token.
    #[must_use]
    pub fn page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    pub(crate) fn endpoint(&self) -> Result<Endpoint, ApiError> {
        let status = self
            .order_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start >= end => {
                return Err(ApiError::validation("start_time must be before end_time"));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ApiError::validation(
                    "start_time and end_time must be given together",
                ));
            }
            (None, None) if status.is_none() => {
                return Err(ApiError::validation(
                    "a time range (start_time, end_time) or an order_status is required",
                ));
            }
            _ => {}
        }

        let page_size = page_size(self.page_size)?.unwrap_or(DEFAULT_ORDER_PAGE_SIZE);
        let page_token = self.page_token.as_deref().filter(|t| !t.is_empty());
        let endpoint = Endpoint::post(ApiVersion::V202309, "order", "orders/search")
            .query("page_size", page_size);

        Ok(match self.style {
            OrderSearchStyle::QueryFilters => endpoint
                .query_opt("start_time", self.start_time)
                .query_opt("end_time", self.end_time)
                .query_opt("order_status", status)
                .query_opt("delivery_option_type", self.delivery_option_type.as_deref())
                .query_opt("buyer_user_id", self.buyer_user_id.as_deref())
                .query_opt("cursor", page_token),
            OrderSearchStyle::BodyFilters => {
                let mut body = Map::new();
                if let Some(start) = self.start_time {
                    body.insert("create_time_ge".to_string(), start.into());
                }
                if let Some(end) = self.end_time {
                    body.insert("create_time_lt".to_string(), end.into());
                }
                if let Some(status) = status {
                    body.insert("order_status".to_string(), status.into());
                }
                if let Some(option) = &self.delivery_option_type {
                    body.insert("delivery_option_type".to_string(), option.as_str().into());
                }
                if let Some(buyer) = &self.buyer_user_id {
                    body.insert("buyer_user_id".to_string(), buyer.as_str().into());
                }
                endpoint
                    .query_opt("page_token", page_token)
                    .body(Value::Object(body))
            }
        })
    }
}

/// Parameters for [`PlatformClient::get_order_tracking`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTrackingParams {
    /// Order to track.
    pub order_id: String,
}

impl OrderTrackingParams {
    /// Creates parameters for `order_id`.
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }

    pub(crate) fn endpoint(&self) -> Result<Endpoint, ApiError> {
        let order_id = path_segment("order_id", &self.order_id)?;
        Ok(Endpoint::get(
            ApiVersion::V202309,
            "fulfillment",
            &format!("orders/{order_id}/tracking"),
        ))
    }
}

impl PlatformClient {
    /// Looks up up to 50 orders by id.
    ///
    /// More than [`MAX_ORDER_IDS`] ids fails with
    /// [`ErrorKind::TooManyIds`](crate::api::ErrorKind::TooManyIds) and no
    /// ids fails with a validation error; neither reaches the network.
    pub async fn get_order_detail(
        &self,
        shop: &ShopIdentifier,
        params: &OrderDetailParams,
    ) -> PlatformOperationResult {
        self.run(shop, params.endpoint()).await
    }

    /// Searches orders by creation time and/or status, one page at a time.
    pub async fn search_orders(
        &self,
        shop: &ShopIdentifier,
        params: &OrderSearchParams,
    ) -> PlatformOperationResult {
        self.run(shop, params.endpoint()).await
    }

    /// Returns the tracking history of an order.
    pub async fn get_order_tracking(
        &self,
        shop: &ShopIdentifier,
        params: &OrderTrackingParams,
    ) -> PlatformOperationResult {
        self.run(shop, params.endpoint()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_detail_joins_ids() {
        let endpoint = OrderDetailParams::new(["1", "2"]).endpoint().unwrap();
        assert_eq!(endpoint.path(), "/order/202507/orders");
        assert_eq!(endpoint.query_value("ids"), Some("1,2"));
    }

    #[test]
    fn test_order_detail_batch_limits() {
        assert!(matches!(
            OrderDetailParams::default().endpoint(),
            Err(ApiError::Validation { .. })
        ));

        let fifty = OrderDetailParams::new((0..50).map(|i| i.to_string()));
        assert!(fifty.endpoint().is_ok());

        let fifty_one = OrderDetailParams::new((0..51).map(|i| i.to_string()));
        assert!(matches!(
            fifty_one.endpoint(),
            Err(ApiError::TooManyIds { count: 51, max: 50 })
        ));
    }

    #[test]
    fn test_search_requires_range_or_status() {
        assert!(OrderSearchParams::default().endpoint().is_err());
        assert!(OrderSearchParams::with_status("AWAITING_SHIPMENT").endpoint().is_ok());
        assert!(OrderSearchParams::created_between(10, 20).endpoint().is_ok());
        assert!(OrderSearchParams::created_between(20, 10).endpoint().is_err());

        let half_range = OrderSearchParams {
            start_time: Some(10),
            order_status: Some("COMPLETED".to_string()),
            ..OrderSearchParams::default()
        };
        assert!(half_range.endpoint().is_err());
    }

    #[test]
    fn test_search_query_filters_use_cursor() {
        let endpoint = OrderSearchParams::created_between(1_700_000_000, 1_700_086_400)
            .page_token("cur-2")
            .endpoint()
            .unwrap();

        assert_eq!(endpoint.path(), "/order/202309/orders/search");
        assert_eq!(endpoint.query_value("start_time"), Some("1700000000"));
        assert_eq!(endpoint.query_value("page_size"), Some("20"));
        assert_eq!(endpoint.query_value("cursor"), Some("cur-2"));
        assert!(endpoint.body_value().is_none());
    }

    #[test]
    fn test_search_body_filters_move_filters_into_body() {
        let params = OrderSearchParams {
            style: OrderSearchStyle::BodyFilters,
            page_size: Some(50),
            ..OrderSearchParams::created_between(1, 2).page_token("tok")
        };
        let endpoint = params.endpoint().unwrap();

        assert_eq!(endpoint.query_value("page_token"), Some("tok"));
        assert_eq!(endpoint.query_value("page_size"), Some("50"));
        assert_eq!(endpoint.query_value("start_time"), None);
        assert_eq!(
            endpoint.body_value(),
            Some(&json!({"create_time_ge": 1, "create_time_lt": 2}))
        );
    }

    #[test]
    fn test_tracking_embeds_order_id_in_path() {
        let endpoint = OrderTrackingParams::new("577120471396553479").endpoint().unwrap();
        assert_eq!(
            endpoint.path(),
            "/fulfillment/202309/orders/577120471396553479/tracking"
        );
        assert!(OrderTrackingParams::new("").endpoint().is_err());
    }
}
