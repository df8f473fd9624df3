use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::{hash_password, verify_password, CurrentUser};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

pub async fn get_profile(CurrentUser(user): CurrentUser) -> Response {
    success(user, "Profile fetched").into_response()
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Response, AppError> {
    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError("name cannot be empty".to_string()));
        }
        user.name = name.trim().to_string();
    }
    if let Some(email) = req.email {
        let email = email.trim().to_string();
        let taken = state
            .identity
            .find_user_by_email(&email)
            .map(|existing| existing.id != user.id)
            .unwrap_or(false);
        if taken {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        user.email = email;
    }
    if let Some(phone) = req.phone {
        user.phone = Some(phone);
    }
    if let Some(address) = req.address {
        user.address = Some(address);
    }
    if let Some(avatar_url) = req.avatar_url {
        user.avatar_url = Some(avatar_url);
    }
    user.updated_at = Utc::now();
    state.identity.save_user(user.clone());

    Ok(success(user, "Profile updated").into_response())
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Response, AppError> {
    if !verify_password(&req.old_password, &user.password_hash) {
        return Err(AppError::ValidationError("Old password incorrect".to_string()));
    }
    if req.new_password.is_empty() {
        return Err(AppError::ValidationError(
            "new password is required".to_string(),
        ));
    }
    user.password_hash = hash_password(&req.new_password)?;
    user.updated_at = Utc::now();
    state.identity.save_user(user);

    Ok(empty_success("Password changed").into_response())
}

pub async fn delete_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    state.identity.delete_user(user.id);
    Ok(empty_success("Account deleted").into_response())
}
