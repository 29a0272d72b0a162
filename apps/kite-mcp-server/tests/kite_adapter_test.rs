//! Kite Adapter Integration Tests
//!
//! Runs `KiteBrokerAdapter` against a mock Kite Connect server and checks
//! routes, headers, request bodies and error classification.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use kite_mcp_server::{
    BrokerConnector, BrokerError, BrokerPort, CancelOrder, Credentials, KiteConfig, KiteConnector,
    ModifyOrder, PlaceOrder,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn success(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "success", "data": data}))
}

fn failure(status: u16, error_type: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "status": "error",
        "message": message,
        "error_type": error_type
    }))
}

fn broker(server: &MockServer) -> Arc<dyn BrokerPort> {
    let config = KiteConfig::new()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(5));
    KiteConnector::new(config)
        .unwrap()
        .connect(&Credentials::new("key", "token"))
        .unwrap()
}

#[tokio::test]
async fn profile_sends_kite_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .and(header("X-Kite-Version", "3"))
        .and(header("Authorization", "token key:token"))
        .respond_with(success(json!({
            "user_id": "AB1234",
            "user_name": "Asha Rao",
            "email": "asha@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = broker(&server).profile().await.unwrap();

    assert_eq!(profile.user_id, "AB1234");
    assert_eq!(profile.display_name(), "Asha Rao");
    assert_eq!(profile.extra["email"], "asha@example.com");
}

#[tokio::test]
async fn holdings_returns_data_untouched() {
    let server = MockServer::start().await;
    let holdings = json!([
        {"tradingsymbol": "INFY", "exchange": "NSE", "quantity": 10, "average_price": 1450.5}
    ]);
    Mock::given(method("GET"))
        .and(path("/portfolio/holdings"))
        .respond_with(success(holdings.clone()))
        .mount(&server)
        .await;

    assert_eq!(broker(&server).holdings().await.unwrap(), holdings);
}

#[tokio::test]
async fn quote_repeats_instrument_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("i", "NSE:INFY"))
        .and(query_param("i", "NSE:TCS"))
        .respond_with(success(json!({
            "NSE:INFY": {"last_price": 1500.0},
            "NSE:TCS": {"last_price": 3900.0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quotes = broker(&server)
        .quote(vec!["NSE:INFY".to_string(), "NSE:TCS".to_string()])
        .await
        .unwrap();

    assert_eq!(quotes["NSE:TCS"]["last_price"], 3900.0);
}

#[tokio::test]
async fn place_order_posts_form_to_variety_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders/regular"))
        .and(body_string_contains("tradingsymbol=INFY"))
        .and(body_string_contains("transaction_type=BUY"))
        .and(body_string_contains("order_type=LIMIT"))
        .and(body_string_contains("quantity=5"))
        .and(body_string_contains("validity=DAY"))
        .respond_with(success(json!({"order_id": "151220000000000"})))
        .expect(1)
        .mount(&server)
        .await;

    let order = PlaceOrder {
        tradingsymbol: "INFY".to_string(),
        exchange: "NSE".to_string(),
        transaction_type: "BUY".to_string(),
        quantity: 5,
        product: "CNC".to_string(),
        order_type: "LIMIT".to_string(),
        price: Some(Decimal::new(14505, 1)),
        trigger_price: None,
        variety: "regular".to_string(),
    };

    let order_id = broker(&server).place_order(order).await.unwrap();
    assert_eq!(order_id, "151220000000000");
}

#[tokio::test]
async fn modify_order_puts_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/orders/regular/151220000000000"))
        .and(body_string_contains("quantity=7"))
        .respond_with(success(json!({"order_id": "151220000000000"})))
        .expect(1)
        .mount(&server)
        .await;

    let order = ModifyOrder {
        order_id: "151220000000000".to_string(),
        variety: "regular".to_string(),
        quantity: Some(7),
        price: None,
        order_type: None,
        trigger_price: None,
        validity: None,
        disclosed_quantity: None,
    };

    let order_id = broker(&server).modify_order(order).await.unwrap();
    assert_eq!(order_id, "151220000000000");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert_eq!(body, "quantity=7");
}

#[tokio::test]
async fn missing_order_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/orders/regular/404"))
        .respond_with(failure(404, "GeneralException", "Order not found"))
        .mount(&server)
        .await;

    let err = broker(&server)
        .cancel_order(CancelOrder {
            order_id: "404".to_string(),
            variety: "regular".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BrokerError::NotFound {
            message: "Order not found".to_string()
        }
    );
}

#[tokio::test]
async fn expired_token_maps_to_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gtt/triggers"))
        .respond_with(failure(403, "TokenException", "Incorrect `api_key` or `access_token`."))
        .mount(&server)
        .await;

    let err = broker(&server).gtts().await.unwrap_err();

    assert!(matches!(err, BrokerError::AuthenticationFailed { .. }));
    assert!(err.to_string().contains("Incorrect `api_key` or `access_token`."));
}

#[tokio::test]
async fn non_json_body_is_a_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/margins"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = broker(&server).margins().await.unwrap_err();
    assert!(matches!(err, BrokerError::ConnectionError { .. }));
}
