use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::{Seller, UserRole};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let seller = state
        .identity
        .find_seller_by_user(user.id)
        .ok_or_else(|| AppError::NotFound("Seller profile not found".to_string()))?;
    Ok(success(seller, "Seller profile fetched").into_response())
}

#[derive(Deserialize)]
pub struct UpsertSellerRequest {
    pub store_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub business_category: Option<String>,
    pub business_level: Option<String>,
}

/// Creates the seller profile on first save, updates it afterwards. Also
/// promotes the account to the seller role.
pub async fn upsert_profile(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    Json(req): Json<UpsertSellerRequest>,
) -> Result<Response, AppError> {
    let now = Utc::now();
    let mut seller = match state.identity.find_seller_by_user(user.id) {
        Some(existing) => existing,
        None => state.identity.create_seller(Seller {
            id: Uuid::new_v4(),
            user_id: user.id,
            store_name: req
                .store_name
                .clone()
                .unwrap_or_else(|| user.name.clone()),
            email: user.email.clone(),
            phone: None,
            address: None,
            description: None,
            business_category: None,
            business_level: None,
            created_at: now,
            updated_at: now,
        }),
    };

    if let Some(store_name) = req.store_name {
        if store_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "store_name cannot be empty".to_string(),
            ));
        }
        seller.store_name = store_name.trim().to_string();
    }
    if let Some(email) = req.email {
        seller.email = email;
    }
    if let Some(phone) = req.phone {
        seller.phone = Some(phone);
    }
    if let Some(address) = req.address {
        seller.address = Some(address);
    }
    if let Some(description) = req.description {
        seller.description = Some(description);
    }
    if let Some(category) = req.business_category {
        seller.business_category = Some(category);
    }
    if let Some(level) = req.business_level {
        seller.business_level = Some(level);
    }
    seller.updated_at = now;
    state.identity.save_seller(seller.clone());

    if user.seller_id != Some(seller.id) || user.role != UserRole::Seller {
        user.seller_id = Some(seller.id);
        user.role = UserRole::Seller;
        user.updated_at = now;
        state.identity.save_user(user);
    }

    Ok(success(seller, "Profile saved").into_response())
}

#[derive(Serialize)]
struct DashboardPayload {
    total_products: usize,
    total_unread_messages: usize,
    total_customer_reviews: usize,
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let seller = state
        .identity
        .find_seller_by_user(user.id)
        .ok_or_else(|| AppError::NotFound("Seller profile not found".to_string()))?;

    let payload = DashboardPayload {
        total_products: state.catalog.count_by_seller(seller.id),
        total_unread_messages: state.messages.unread_total(user.id),
        total_customer_reviews: state.reviews.count_by_seller(seller.id),
    };
    Ok(success(payload, "Dashboard fetched").into_response())
}
