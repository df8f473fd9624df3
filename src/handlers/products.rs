use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::Product;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub async fn list_products(State(state): State<AppState>) -> Response {
    success(state.catalog.list(), "Products fetched").into_response()
}

pub async fn list_by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<Uuid>,
) -> Response {
    success(state.catalog.list_by_seller(seller_id), "Products fetched").into_response()
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub quantity: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<Response, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError("name is required".to_string()));
    }
    if req.price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "price cannot be negative".to_string(),
        ));
    }
    let quantity = req.quantity.unwrap_or(0);
    if quantity < 0 {
        return Err(AppError::ValidationError(
            "quantity cannot be negative".to_string(),
        ));
    }
    let seller = state
        .identity
        .find_seller_by_user(user.id)
        .ok_or_else(|| AppError::Forbidden("Seller profile required".to_string()))?;

    let now = Utc::now();
    let product = state.catalog.create(Product {
        id: Uuid::new_v4(),
        user_id: user.id,
        seller_id: Some(seller.id),
        name: req.name.trim().to_string(),
        category: req.category,
        price: req.price,
        quantity,
        description: req.description,
        image_url: req.image_url,
        created_at: now,
        updated_at: now,
    });

    Ok(created(product, "Product created").into_response())
}

pub async fn remove_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let product = state
        .catalog
        .find(id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    if product.user_id != user.id {
        return Err(AppError::Forbidden(
            "Only the owner can delete a product".to_string(),
        ));
    }
    state.catalog.delete(id);
    Ok(empty_success("Deleted").into_response())
}
