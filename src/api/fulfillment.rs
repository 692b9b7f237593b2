//! Fulfillment operations: packages, shipping documents and seller shipments.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{path_segment, required, Endpoint, PlatformClient};
use crate::api::envelope::PlatformOperationResult;
use crate::api::errors::ApiError;
use crate::auth::ShopIdentifier;
use crate::config::ApiVersion;

/// Document type requested when none is given.
pub const DEFAULT_DOCUMENT_TYPE: &str = "SHIPPING_LABEL_PDF";

/// Package dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Length, as a decimal string.
    pub length: String,
    /// Width, as a decimal string.
    pub width: String,
    /// Height, as a decimal string.
    pub height: String,
    /// `CM` or `INCH`.
    pub unit: String,
}

/// Package weight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weight {
    /// Weight, as a decimal string.
    pub value: String,
    /// `GRAM`, `KILOGRAM`, `POUND` or the platform's short forms.
    pub unit: String,
}

/// Parameters for [`PlatformClient::create_package`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePackageParams {
    /// Order the package ships.
    pub order_id: String,
    /// Package dimensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    /// Package weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    /// Shipping service chosen from the order's eligible services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_service_id: Option<String>,
}

impl CreatePackageParams {
    /// Creates parameters for `order_id` with no optional fields.
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            ..Self::default()
        }
    }

    pub(crate) fn endpoint(&self) -> Result<Endpoint, ApiError> {
        let mut body = self.clone();
        body.order_id = required("order_id", &self.order_id)?;
        body.shipping_service_id = body.shipping_service_id.filter(|id| !id.trim().is_empty());

        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::validation(format!("package body: {e}")))?;
        Ok(Endpoint::post(ApiVersion::V202309, "fulfillment", "packages")
            .body(body)
            .upload())
    }
}

/// Parameters for [`PlatformClient::get_shipping_documents`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDocumentsParams {
    /// Package whose documents are requested.
    pub package_id: String,
    /// Document type; defaults to [`DEFAULT_DOCUMENT_TYPE`].
    #[serde(default = "default_document_type")]
    pub document_type: String,
    /// Label size (e.g. `A6`).
    #[serde(default)]
    pub document_size: Option<String>,
    /// Label format (e.g. `PDF`).
    #[serde(default)]
    pub document_format: Option<String>,
}

fn default_document_type() -> String {
    DEFAULT_DOCUMENT_TYPE.to_string()
}

impl ShippingDocumentsParams {
    /// Creates parameters for the shipping label of `package_id`.
    pub fn new(package_id: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            document_type: default_document_type(),
            document_size: None,
            document_format: None,
        }
    }

    pub(crate) fn endpoint(&self) -> Result<Endpoint, ApiError> {
        let package_id = path_segment("package_id", &self.package_id)?;
        let document_type = match self.document_type.trim() {
            "" => DEFAULT_DOCUMENT_TYPE,
            other => other,
        };
        Ok(Endpoint::get(
            ApiVersion::V202309,
            "fulfillment",
            &format!("packages/{package_id}/shipping_documents"),
        )
        .query("document_type", document_type)
        .query_opt("document_size", self.document_size.as_deref())
        .query_opt("document_format", self.document_format.as_deref()))
    }
}

/// Parameters for [`PlatformClient::mark_package_shipped`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkShippedParams {
    /// Order being shipped.
    pub order_id: String,
    /// Carrier tracking number.
    pub tracking_number: String,
    /// Carrier id from the platform's shipping provider list.
    pub shipping_provider_id: String,
}

impl MarkShippedParams {
    pub(crate) fn endpoint(&self) -> Result<Endpoint, ApiError> {
        let order_id = path_segment("order_id", &self.order_id)?;
        let tracking_number = required("tracking_number", &self.tracking_number)?;
        let shipping_provider_id = required("shipping_provider_id", &self.shipping_provider_id)?;

        Ok(Endpoint::post(
            ApiVersion::V202309,
            "fulfillment",
            &format!("orders/{order_id}/packages"),
        )
        .body(json!({
            "tracking_number": tracking_number,
            "shipping_provider_id": shipping_provider_id,
        }))
        .upload())
    }
}

impl PlatformClient {
    /// Creates a package (and platform shipping label) for an order.
    ///
    /// The JSON body participates in the signature.
    pub async fn create_package(
        &self,
        shop: &ShopIdentifier,
        params: &CreatePackageParams,
    ) -> PlatformOperationResult {
        self.run(shop, params.endpoint()).await
    }

    /// Returns the shipping label or other documents of a package.
    pub async fn get_shipping_documents(
        &self,
        shop: &ShopIdentifier,
        params: &ShippingDocumentsParams,
    ) -> PlatformOperationResult {
        self.run(shop, params.endpoint()).await
    }

    /// Marks an order shipped with a seller-arranged carrier.
    pub async fn mark_package_shipped(
        &self,
        shop: &ShopIdentifier,
        params: &MarkShippedParams,
    ) -> PlatformOperationResult {
        self.run(shop, params.endpoint()).await
    }
}
