//! End-to-end payment flow through the HTTP router: initiation, signed
//! gateway webhooks, duplicate delivery, and the always-acknowledge
//! contract.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use tradelink_server::auth::sign_token;
use tradelink_server::config::{Config, PaymentConfig};
use tradelink_server::models::{OrderStatus, Product, Seller, User, UserRole};
use tradelink_server::notify::LogDispatcher;
use tradelink_server::payments::signature::sign_body;
use tradelink_server::routes::{create_routes, AppState};

const GATEWAY_SECRET: &str = "gw-secret";
const LEGACY_SECRET: &str = "legacy-hash";
const JWT_SECRET: &str = "test-jwt-secret";

struct TestApp {
    state: AppState,
    app: Router,
    buyer_token: String,
    product_id: Uuid,
}

fn test_app(stock: i32, price: i64) -> TestApp {
    let config = Config {
        port: 0,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_ttl_hours: 1,
        client_url: "http://localhost:5173".to_string(),
        payment: PaymentConfig {
            gateway_secret: GATEWAY_SECRET.to_string(),
            legacy_webhook_secret: LEGACY_SECRET.to_string(),
            currency: "NGN".to_string(),
            gateway_public_key: Some("pk_test".to_string()),
        },
    };
    let state = AppState::new(config, Arc::new(LogDispatcher));

    let now = Utc::now();
    let owner_id = Uuid::new_v4();
    let seller = state.identity.create_seller(Seller {
        id: Uuid::new_v4(),
        user_id: owner_id,
        store_name: "Ada's Store".to_string(),
        email: "store@example.com".to_string(),
        phone: None,
        address: None,
        description: None,
        business_category: None,
        business_level: None,
        created_at: now,
        updated_at: now,
    });
    let product = state.catalog.create(Product {
        id: Uuid::new_v4(),
        user_id: owner_id,
        seller_id: Some(seller.id),
        name: "Basket".to_string(),
        category: None,
        price: Decimal::from(price),
        quantity: stock,
        description: None,
        image_url: None,
        created_at: now,
        updated_at: now,
    });
    let buyer = state
        .identity
        .create_user(User {
            id: Uuid::new_v4(),
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: "unused".to_string(),
            role: UserRole::Buyer,
            phone: None,
            address: None,
            avatar_url: None,
            email_verified: true,
            seller_id: None,
            verify_token: None,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        })
        .unwrap();
    let buyer_token = sign_token(&buyer, JWT_SECRET, 1).unwrap();

    let app = create_routes(state.clone());
    TestApp {
        state,
        app,
        buyer_token,
        product_id: product.id,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn initiate(test: &TestApp, quantity: i32) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/payments/initiate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", test.buyer_token),
        )
        .body(Body::from(
            json!({ "product_id": test.product_id, "quantity": quantity }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&test.app, request).await;
    assert_eq!(status, StatusCode::OK, "initiate failed: {body}");
    body["data"].clone()
}

fn gateway_webhook_request(body: &str, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/payments/gateway/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-gateway-signature", signature)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn initiation_creates_a_pending_order_with_exact_amount() {
    let test = test_app(10, 1000);
    let checkout = initiate(&test, 2).await;

    let reference = checkout["reference"].as_str().unwrap();
    assert!(reference.starts_with("TL-"));

    let order = test.state.orders.find_by_reference(reference).unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.amount, Decimal::from(2000));
    assert_eq!(order.currency, "NGN");

    // A second initiation gets its own reference.
    let second = initiate(&test, 1).await;
    assert_ne!(second["reference"].as_str().unwrap(), reference);
}

#[tokio::test]
async fn signed_success_webhook_settles_the_order_idempotently() {
    let test = test_app(10, 1000);
    let checkout = initiate(&test, 2).await;
    let reference = checkout["reference"].as_str().unwrap();

    let body = json!({
        "event": "charge.success",
        "data": { "reference": reference, "id": 424242 }
    })
    .to_string();
    let signature = sign_body(GATEWAY_SECRET, body.as_bytes());

    let (status, response) = send(&test.app, gateway_webhook_request(&body, &signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "received": true }));

    let order = test.state.orders.find_by_reference(reference).unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.gateway_tx_id.as_deref(), Some("424242"));
    assert_eq!(test.state.catalog.find(test.product_id).unwrap().quantity, 8);
    assert_eq!(test.state.ledger.len(), 1);

    // Identical redelivery is acknowledged without further side effects.
    let (status, response) = send(&test.app, gateway_webhook_request(&body, &signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "received": true }));
    assert_eq!(test.state.catalog.find(test.product_id).unwrap().quantity, 8);
    assert_eq!(test.state.ledger.len(), 1);
}

#[tokio::test]
async fn tampered_body_is_unauthorized_with_no_side_effects() {
    let test = test_app(10, 1000);
    let checkout = initiate(&test, 1).await;
    let reference = checkout["reference"].as_str().unwrap().to_string();

    let body = json!({
        "event": "charge.success",
        "data": { "reference": reference }
    })
    .to_string();
    let signature = sign_body(GATEWAY_SECRET, body.as_bytes());
    let tampered = body.replace("charge.success", "charge.tampered");

    let (status, response) = send(&test.app, gateway_webhook_request(&tampered, &signature)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["success"], json!(false));

    let order = test.state.orders.find_by_reference(&reference).unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(test.state.catalog.find(test.product_id).unwrap().quantity, 10);
    assert_eq!(test.state.ledger.len(), 0);
}

#[tokio::test]
async fn unknown_reference_is_still_acknowledged() {
    let test = test_app(10, 1000);
    let body = json!({
        "event": "charge.success",
        "data": { "reference": "TL-unknown" }
    })
    .to_string();
    let signature = sign_body(GATEWAY_SECRET, body.as_bytes());

    let (status, response) = send(&test.app, gateway_webhook_request(&body, &signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "received": true }));
    assert_eq!(test.state.ledger.len(), 0);
}

#[tokio::test]
async fn failure_webhook_marks_the_order_failed_without_side_effects() {
    let test = test_app(10, 1000);
    let checkout = initiate(&test, 3).await;
    let reference = checkout["reference"].as_str().unwrap();

    let body = json!({
        "event": "charge.failed",
        "data": { "reference": reference, "status": "failed", "id": 99 }
    })
    .to_string();
    let signature = sign_body(GATEWAY_SECRET, body.as_bytes());

    let (status, _) = send(&test.app, gateway_webhook_request(&body, &signature)).await;
    assert_eq!(status, StatusCode::OK);

    let order = test.state.orders.find_by_reference(reference).unwrap();
    assert_eq!(order.status, OrderStatus::Failed);
    assert_eq!(test.state.catalog.find(test.product_id).unwrap().quantity, 10);
    assert!(test.state.ledger.is_empty());
}

#[tokio::test]
async fn legacy_webhook_uses_the_shared_secret_header() {
    let test = test_app(5, 500);
    let checkout = initiate(&test, 1).await;
    let reference = checkout["reference"].as_str().unwrap();

    let body = json!({
        "data": { "txRef": reference, "status": "successful", "id": "flw-1" }
    })
    .to_string();

    // Wrong secret is rejected before any processing.
    let rejected = Request::builder()
        .method("POST")
        .uri("/api/v1/payments/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header("verif-hash", "wrong")
        .body(Body::from(body.clone()))
        .unwrap();
    let (status, _) = send(&test.app, rejected).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        test.state.orders.find_by_reference(reference).unwrap().status,
        OrderStatus::Pending
    );

    let accepted = Request::builder()
        .method("POST")
        .uri("/api/v1/payments/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header("verif-hash", LEGACY_SECRET)
        .body(Body::from(body))
        .unwrap();
    let (status, response) = send(&test.app, accepted).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "received": true }));

    let order = test.state.orders.find_by_reference(reference).unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.gateway_tx_id.as_deref(), Some("flw-1"));
    assert_eq!(test.state.catalog.find(test.product_id).unwrap().quantity, 4);
}

#[tokio::test]
async fn initiation_requires_authentication() {
    let test = test_app(10, 1000);
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/payments/initiate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "product_id": test.product_id }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&test.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!("AUTH_ERROR"));
}

#[tokio::test]
async fn buyer_order_listing_is_paginated() {
    let test = test_app(100, 10);
    for _ in 0..3 {
        initiate(&test, 1).await;
    }

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/payments/orders?page=1&limit=2")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", test.buyer_token),
        )
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&test.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(3));
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_check_is_public() {
    let test = test_app(1, 1);
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&test.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("ok"));
}
