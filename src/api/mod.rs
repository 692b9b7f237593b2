//! TikTok Shop platform operations.
//!
//! # Overview
//!
//! - [`PlatformClient`]: runs every operation for an explicitly named shop
//! - [`PlatformOperationResult`]: the envelope every operation returns
//! - [`ApiError`] / [`ErrorKind`]: what went wrong, folded into the envelope
//!
//! # Operations
//!
//! | Method | Endpoint | Version |
//! |--------|----------|---------|
//! | [`get_order_detail`](PlatformClient::get_order_detail) | `GET /order/202507/orders` | 202507 |
//! | [`search_orders`](PlatformClient::search_orders) | `POST /order/202309/orders/search` | 202309 |
//! | [`get_order_tracking`](PlatformClient::get_order_tracking) | `GET /fulfillment/202309/orders/{id}/tracking` | 202309 |
//! | [`create_package`](PlatformClient::create_package) | `POST /fulfillment/202309/packages` | 202309 |
//! | [`get_shipping_documents`](PlatformClient::get_shipping_documents) | `GET /fulfillment/202309/packages/{id}/shipping_documents` | 202309 |
//! | [`mark_package_shipped`](PlatformClient::mark_package_shipped) | `POST /fulfillment/202309/orders/{id}/packages` | 202309 |
//! | [`list_statements`](PlatformClient::list_statements) | `GET /finance/202309/statements` | 202309 |
//!
//! Operations never return `Err` and never panic: every failure, including
//! parameter validation, comes back as `success: false`.

mod client;
mod envelope;
mod errors;
mod finance;
mod fulfillment;
mod orders;

pub use client::{PlatformClient, MAX_PAGE_SIZE};
pub use envelope::PlatformOperationResult;
pub use errors::{ApiError, ErrorKind};
pub use finance::{SortOrder, StatementListParams, DEFAULT_STATEMENT_SORT_FIELD};
pub use fulfillment::{
    CreatePackageParams, Dimension, MarkShippedParams, ShippingDocumentsParams, Weight,
    DEFAULT_DOCUMENT_TYPE,
};
pub use orders::{
    OrderDetailParams, OrderSearchParams, OrderSearchStyle, OrderTrackingParams,
    DEFAULT_ORDER_PAGE_SIZE, MAX_ORDER_IDS,
};
