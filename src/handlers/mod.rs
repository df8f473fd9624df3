use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

pub mod auth;
pub mod messages;
pub mod payments;
pub mod products;
pub mod reviews;
pub mod sellers;
pub mod services;
pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "tradelink-api",
    };

    success(payload, "Health check successful").into_response()
}
