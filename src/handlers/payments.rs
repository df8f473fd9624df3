use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::payments::notification::{GatewayEvent, LegacyEvent};
use crate::payments::GatewayNotification;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

/// Signature header for the current gateway scheme (HMAC-SHA512 over the
/// raw body).
const GATEWAY_SIGNATURE_HEADER: &str = "x-gateway-signature";
/// Shared-secret header used by the legacy gateway integration.
const LEGACY_HASH_HEADER: &str = "verif-hash";

#[derive(Deserialize)]
pub struct InitiateRequest {
    pub product_id: Uuid,
    pub quantity: Option<i32>,
}

pub async fn initiate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<InitiateRequest>,
) -> Result<Response, AppError> {
    let checkout = state
        .processor
        .initiate(&user, req.product_id, req.quantity.unwrap_or(1))
        .await?;
    Ok(success(checkout, "Payment initiated").into_response())
}

/// Current gateway webhook. Authenticity is checked against the exact raw
/// bytes before anything is parsed or any store is touched; past that point
/// every outcome is acknowledged so the gateway stops redelivering.
pub async fn gateway_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = header_str(&headers, GATEWAY_SIGNATURE_HEADER);
    if !state.verifier.verify_gateway(&body, signature) {
        return AppError::AuthError("Invalid signature".to_string()).into_response();
    }

    match serde_json::from_slice::<GatewayEvent>(&body) {
        Ok(event) => confirm(&state, GatewayNotification::CurrentV2(event)).await,
        Err(e) => tracing::warn!(error = %e, "unparseable gateway webhook body"),
    }
    acknowledge()
}

/// Legacy gateway webhook, retained for backwards compatibility.
pub async fn legacy_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.verifier.verify_legacy(header_str(&headers, LEGACY_HASH_HEADER)) {
        return AppError::AuthError("Invalid hash".to_string()).into_response();
    }

    match serde_json::from_slice::<LegacyEvent>(&body) {
        Ok(event) => confirm(&state, GatewayNotification::LegacyV1(event)).await,
        Err(e) => tracing::warn!(error = %e, "unparseable legacy webhook body"),
    }
    acknowledge()
}

async fn confirm(state: &AppState, notification: GatewayNotification) {
    match notification.normalize() {
        Some(charge) => {
            state.processor.confirm(charge).await;
        }
        None => tracing::info!("webhook notification without a merchant reference"),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn acknowledge() -> Response {
    Json(json!({ "received": true })).into_response()
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

pub async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = state.orders.list_by_buyer(
        user.id,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(20),
    );
    success(page, "Orders fetched").into_response()
}

pub async fn seller_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let seller = state
        .identity
        .find_seller_by_user(user.id)
        .ok_or_else(|| AppError::NotFound("Seller profile not found".to_string()))?;
    let page = state.ledger.list_by_seller(
        seller.id,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(20),
    );
    Ok(success(page, "Transactions fetched").into_response())
}
