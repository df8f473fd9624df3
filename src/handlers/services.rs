use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::{Service, WorkingHours};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub async fn list_services(State(state): State<AppState>) -> Response {
    success(state.services.list(), "Services fetched").into_response()
}

pub async fn list_by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<Uuid>,
) -> Response {
    success(state.services.list_by_seller(seller_id), "Services fetched").into_response()
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub services_offered: Vec<String>,
    #[serde(default)]
    pub working_hours: Vec<WorkingHours>,
}

pub async fn create_service(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateServiceRequest>,
) -> Result<Response, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError("name is required".to_string()));
    }
    if matches!(req.price, Some(price) if price < Decimal::ZERO) {
        return Err(AppError::ValidationError(
            "price cannot be negative".to_string(),
        ));
    }
    let seller = state
        .identity
        .find_seller_by_user(user.id)
        .ok_or_else(|| AppError::Forbidden("Seller profile required".to_string()))?;

    let now = Utc::now();
    let service = state.services.create(Service {
        id: Uuid::new_v4(),
        user_id: user.id,
        seller_id: Some(seller.id),
        name: req.name.trim().to_string(),
        category: req.category,
        price: req.price,
        description: req.description,
        image_url: req.image_url,
        services_offered: req.services_offered,
        working_hours: req.working_hours,
        created_at: now,
        updated_at: now,
    });

    Ok(created(service, "Service created").into_response())
}

pub async fn remove_service(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let service = state
        .services
        .find(id)
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
    if service.user_id != user.id {
        return Err(AppError::Forbidden(
            "Only the owner can delete a service".to_string(),
        ));
    }
    state.services.delete(id);
    Ok(empty_success("Deleted").into_response())
}
