use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::Review;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub seller_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
}

pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateReviewRequest>,
) -> Result<Response, AppError> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::ValidationError(
            "rating must be between 1 and 5".to_string(),
        ));
    }
    if state.identity.find_seller(req.seller_id).is_none() {
        return Err(AppError::NotFound("Seller not found".to_string()));
    }

    let review = state.reviews.create(Review {
        id: Uuid::new_v4(),
        seller_id: req.seller_id,
        user_id: user.id,
        rating: req.rating,
        comment: req.comment,
        created_at: Utc::now(),
    });

    Ok(created(review, "Review created").into_response())
}

pub async fn list_by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<Uuid>,
) -> Response {
    success(state.reviews.list_by_seller(seller_id), "Reviews fetched").into_response()
}
