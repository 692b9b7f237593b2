//! Property tests for the request signature engine.
//!
//! These tests verify the signing properties the platform relies on:
//! - Determinism regardless of query insertion order
//! - `sign` and `access_token` never affect the signature
//! - A non-empty body always changes the signature
//! - The signature the transport puts on the wire verifies against the
//!   query string actually sent

use std::collections::BTreeMap;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::{Map, Value};
use tiktok_shop_api::auth::signature::{canonical_string, compute_signature, sign, verify_signature};
use tiktok_shop_api::{AppKey, AppSecret, HttpMethod, SignedRequest};

const PATH: &str = "/order/202507/orders";

fn query_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z_]{1,12}", "[A-Za-z0-9,._-]{0,16}", 0..10)
}

proptest! {
    #[test]
    fn signature_is_independent_of_insertion_order(
        queries in query_map(),
        secret in "[A-Za-z0-9]{1,40}",
        seed in any::<u64>(),
    ) {
        let mut shuffled: Vec<(&String, &String)> = queries.iter().collect();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(
            sign(PATH, &queries, &secret, None),
            sign(PATH, shuffled, &secret, None)
        );
    }

    #[test]
    fn sign_and_access_token_are_excluded(
        queries in query_map(),
        secret in "[A-Za-z0-9]{1,40}",
        sign_value in "[a-f0-9]{0,64}",
        token_value in "[A-Za-z0-9_]{0,64}",
    ) {
        let baseline = sign(PATH, &queries, &secret, None);

        let mut polluted = queries.clone();
        polluted.insert("sign".to_string(), sign_value);
        polluted.insert("access_token".to_string(), token_value);

        prop_assert_eq!(baseline, sign(PATH, &polluted, &secret, None));
    }

    #[test]
    fn non_empty_body_changes_signature(
        queries in query_map(),
        secret in "[A-Za-z0-9]{1,40}",
        fields in prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{0,8}", 1..5),
    ) {
        let body: Map<String, Value> = fields
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        let body = Value::Object(body);

        prop_assert_ne!(
            sign(PATH, &queries, &secret, None),
            sign(PATH, &queries, &secret, Some(&body))
        );
    }

    #[test]
    fn signature_is_lowercase_hex(queries in query_map(), secret in "[A-Za-z0-9]{1,40}") {
        let signature = sign(PATH, &queries, &secret, None);
        prop_assert_eq!(signature.len(), 64);
        prop_assert!(signature.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn wire_query_string_verifies(
        ids in prop::collection::vec(1_u64..u64::MAX, 1..5),
        page_size in 1_u32..100,
        timestamp in 1_600_000_000_i64..2_000_000_000,
    ) {
        let ids = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
        let request = SignedRequest::builder(HttpMethod::Get, PATH)
            .query_param("ids", &ids)
            .query_param("page_size", page_size)
            .timestamp(timestamp)
            .sign(&AppKey::new("k1").unwrap(), &AppSecret::new("s1").unwrap())
            .unwrap();

        let sent: Vec<(String, String)> = request
            .query_string()
            .split('&')
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap();
                (
                    urlencoding::decode(k).unwrap().into_owned(),
                    urlencoding::decode(v).unwrap().into_owned(),
                )
            })
            .collect();
        let received_sign = sent.iter().find(|(k, _)| k == "sign").unwrap().1.clone();

        let pairs = sent.iter().map(|(k, v)| (k, v));
        prop_assert!(verify_signature(PATH, pairs, "s1", None, &received_sign));
    }
}

// ============================================================================
// Concrete vectors
// ============================================================================

#[test]
fn test_order_detail_vector_matches_wrapped_canonical_string() {
    let queries = [
        ("app_key", "k1"),
        ("timestamp", "1700000000"),
        ("ids", "1,2"),
        ("shop_cipher", "c1"),
        ("version", "202507"),
    ];

    let canonical = canonical_string(PATH, queries, None);
    assert_eq!(
        canonical,
        "/order/202507/ordersapp_keyk1ids1,2shop_cipherc1timestamp1700000000version202507"
    );

    let expected = compute_signature(&format!("s1{canonical}s1"), "s1");
    assert_eq!(sign(PATH, queries, "s1", None), expected);
    assert_eq!(
        expected,
        "b14155f779ae57c457713ffd63db13d95762cebbc4a69283142b50a8e3ab83ad"
    );
}

#[test]
fn test_empty_query_map_signs_secret_path_secret() {
    let empty: [(&str, &str); 0] = [];
    assert_eq!(
        sign(PATH, empty, "s1", None),
        compute_signature("s1/order/202507/orderss1", "s1")
    );
    assert_eq!(
        sign(PATH, empty, "s1", None),
        "9dbf5a5c95b3b77d64ec89e89649d37ecf5b5a28cc96745cfbfe3b36fbf2fc48"
    );
}

#[test]
fn test_create_package_body_vector() {
    let queries = [
        ("app_key", "k1"),
        ("timestamp", "1700000000"),
        ("shop_cipher", "c1"),
        ("version", "202309"),
    ];
    let body = serde_json::json!({
        "order_id": "577120471396553479",
        "weight": {"value": "0.25", "unit": "lb"}
    });

    assert_eq!(
        sign("/fulfillment/202309/packages", queries, "s1", Some(&body)),
        "e615e55747437182a8211f63a3aa0dca364f63a403bfa2070ea5fc2d82290137"
    );
}
