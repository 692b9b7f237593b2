//! Integration tests for the remote credential lookup.
//!
//! These tests run [`RemoteCredentialLookup`] against a wiremock lookup
//! service and verify document decoding, the not-found contract and that
//! lookup failures never echo a secret.

use std::time::Duration;

use serde_json::json;
use tiktok_shop_api::auth::{
    CredentialError, Platform, RemoteCredentialLookup, ShopStatus, LOOKUP_PATH,
};
use tiktok_shop_api::{BaseUrl, CredentialProvider, ShopIdentifier, TokenState};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lookup(server: &MockServer) -> RemoteCredentialLookup {
    RemoteCredentialLookup::new(BaseUrl::new(server.uri()).unwrap())
}

fn document() -> serde_json::Value {
    json!({
        "platform": "tiktok",
        "shop_id": "7495",
        "shop_code": "USLC1",
        "shop_name": "Baby Shop",
        "access_token": "TTP_access",
        "refresh_token": "TTP_refresh",
        "cipher": "ROW_cipher",
        "status": "active",
        "appKey": "k1",
        "appSecret": "lookup-secret"
    })
}

#[tokio::test]
async fn test_lookup_by_name_decodes_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LOOKUP_PATH))
        .and(query_param("shop_name", "Baby Shop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document()])))
        .expect(1)
        .mount(&server)
        .await;

    let shop = lookup(&server)
        .get_credentials(&ShopIdentifier::name("Baby Shop"))
        .await
        .unwrap();

    assert_eq!(shop.platform, Platform::Tiktok);
    assert_eq!(shop.shop_id, "7495");
    assert_eq!(shop.shop_name, "Baby Shop");
    assert_eq!(shop.shop_code.as_deref(), Some("USLC1"));
    assert_eq!(shop.app_key.as_ref(), "k1");
    assert_eq!(shop.app_secret.as_ref(), "lookup-secret");
    assert_eq!(shop.access_token().unwrap().as_ref(), "TTP_access");
    assert_eq!(shop.refresh_token().unwrap().as_ref(), "TTP_refresh");
    assert_eq!(shop.shop_cipher().unwrap().as_ref(), "ROW_cipher");
    assert_eq!(shop.status, ShopStatus::Active);
    assert_eq!(shop.token_state(), TokenState::Authorized);
}

#[tokio::test]
async fn test_lookup_by_id_uses_shop_id_parameter() {
    let server = MockServer::start().await;
    Mock::given(path(LOOKUP_PATH))
        .and(query_param("shop_id", "7495"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document()])))
        .expect(1)
        .mount(&server)
        .await;

    let shop = lookup(&server)
        .get_credentials(&ShopIdentifier::id("7495"))
        .await
        .unwrap();

    assert_eq!(shop.shop_name, "Baby Shop");
}

#[tokio::test]
async fn test_first_document_wins() {
    let server = MockServer::start().await;
    let mut second = document();
    second["shop_id"] = json!("9999");
    Mock::given(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document(), second])))
        .mount(&server)
        .await;

    let shop = lookup(&server)
        .get_credentials(&ShopIdentifier::name("Baby Shop"))
        .await
        .unwrap();

    assert_eq!(shop.shop_id, "7495");
}

#[tokio::test]
async fn test_empty_array_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let error = lookup(&server)
        .get_credentials(&ShopIdentifier::name("Nobody"))
        .await
        .unwrap_err();

    assert!(matches!(error, CredentialError::NotFound { .. }));
    assert_eq!(
        error.to_string(),
        "No shop credentials found for shop name 'Nobody'"
    );
}

#[tokio::test]
async fn test_server_error_is_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let error = lookup(&server)
        .get_credentials(&ShopIdentifier::name("Baby Shop"))
        .await
        .unwrap_err();

    assert!(matches!(error, CredentialError::Lookup(ref e) if e.status() == Some(500)));
}

#[tokio::test]
async fn test_malformed_body_is_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = lookup(&server)
        .get_credentials(&ShopIdentifier::name("Baby Shop"))
        .await
        .unwrap_err();

    assert!(matches!(error, CredentialError::Lookup(_)));
}

#[tokio::test]
async fn test_document_without_secret_is_incomplete() {
    let server = MockServer::start().await;
    let mut doc = document();
    doc.as_object_mut().unwrap().remove("appSecret");
    Mock::given(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([doc])))
        .mount(&server)
        .await;

    let error = lookup(&server)
        .get_credentials(&ShopIdentifier::name("Baby Shop"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        CredentialError::Incomplete { ref shop, field: "an app secret" } if shop == "Baby Shop"
    ));
}

#[tokio::test]
async fn test_unauthorized_and_inactive_shop_decodes() {
    let server = MockServer::start().await;
    let doc = json!({
        "platform": "Etsy",
        "shop_id": "12",
        "shop_name": "Craft Shop",
        "status": "INACTIVE",
        "app_key": "k2",
        "app_secret": "s2"
    });
    Mock::given(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([doc])))
        .mount(&server)
        .await;

    let shop = lookup(&server)
        .get_credentials(&ShopIdentifier::name("Craft Shop"))
        .await
        .unwrap();

    assert_eq!(shop.platform, Platform::Etsy);
    assert_eq!(shop.status, ShopStatus::Inactive);
    assert!(!shop.is_active());
    assert_eq!(shop.token_state(), TokenState::Unauthorized);
    assert!(shop.shop_cipher().is_none());
}

#[tokio::test]
async fn test_debug_output_masks_secrets() {
    let server = MockServer::start().await;
    Mock::given(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document()])))
        .mount(&server)
        .await;

    let shop = lookup(&server)
        .get_credentials(&ShopIdentifier::name("Baby Shop"))
        .await
        .unwrap();

    let debug = format!("{shop:?}");
    assert!(!debug.contains("lookup-secret"));
    assert!(!debug.contains("TTP_access"));
    assert!(!debug.contains("TTP_refresh"));
}

#[tokio::test]
async fn test_slow_lookup_times_out() {
    let server = MockServer::start().await;
    Mock::given(path(LOOKUP_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([document()]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let error = lookup(&server)
        .with_timeout(Duration::from_millis(200))
        .get_credentials(&ShopIdentifier::name("Baby Shop"))
        .await
        .unwrap_err();

    assert!(matches!(error, CredentialError::Lookup(ref e) if e.is_timeout()));
}
