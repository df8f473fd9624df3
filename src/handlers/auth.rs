use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{generate_email_token, hash_password, sign_token, verify_password};
use crate::models::{Seller, User, UserRole};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

const RESET_TOKEN_TTL_HOURS: i64 = 1;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    // Presence of any store field registers the account as a seller.
    pub store_name: Option<String>,
    pub business_category: Option<String>,
    pub business_level: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize)]
struct RegisteredPayload {
    user_id: Uuid,
    role: UserRole,
    seller_id: Option<Uuid>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "name, email and password are required".to_string(),
        ));
    }
    if state.identity.find_user_by_email(&req.email).is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let verify_token = generate_email_token()?;
    let now = Utc::now();
    let mut user = state.identity.create_user(User {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        password_hash,
        role: UserRole::Buyer,
        phone: req.phone,
        address: req.address,
        avatar_url: None,
        email_verified: false,
        seller_id: None,
        verify_token: Some(verify_token.clone()),
        reset_token: None,
        reset_token_expires_at: None,
        created_at: now,
        updated_at: now,
    })?;

    let registering_as_seller = req.store_name.is_some()
        || req.business_category.is_some()
        || req.business_level.is_some();
    if registering_as_seller {
        let seller = state.identity.create_seller(Seller {
            id: Uuid::new_v4(),
            user_id: user.id,
            store_name: req.store_name.unwrap_or_else(|| user.name.clone()),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            description: req.description,
            business_category: req.business_category,
            business_level: req.business_level,
            created_at: now,
            updated_at: now,
        });
        user.role = UserRole::Seller;
        user.seller_id = Some(seller.id);
        state.identity.save_user(user.clone());
    }

    let verify_url = format!(
        "{}/verify-email/{}",
        state.config.client_url.trim_end_matches('/'),
        verify_token
    );
    if let Err(e) = state
        .dispatcher
        .send_verification(&user.email, &verify_url)
        .await
    {
        tracing::warn!(error = ?e, "verification email failed to send");
    }

    Ok(created(
        RegisteredPayload {
            user_id: user.id,
            role: user.role,
            seller_id: user.seller_id,
        },
        "Registered. Please check your email to verify your account.",
    )
    .into_response())
}

pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    let mut user = state
        .identity
        .find_user_by_verify_token(&token)
        .ok_or_else(|| AppError::ValidationError("Invalid or expired token".to_string()))?;

    user.email_verified = true;
    user.verify_token = None;
    user.updated_at = Utc::now();
    state.identity.save_user(user);

    Ok(empty_success("Email verified").into_response())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginPayload {
    token: String,
    role: UserRole,
    user_id: Uuid,
    seller_id: Option<Uuid>,
    name: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let user = state
        .identity
        .find_user_by_email(&req.email)
        .filter(|u| verify_password(&req.password, &u.password_hash))
        .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

    let token = sign_token(&user, &state.config.jwt_secret, state.config.jwt_ttl_hours)?;
    Ok(success(
        LoginPayload {
            token,
            role: user.role,
            user_id: user.id,
            seller_id: user.seller_id,
            name: user.name,
        },
        "Logged in",
    )
    .into_response())
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Always responds neutrally so the endpoint cannot be used to probe which
/// emails are registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Response, AppError> {
    if let Some(mut user) = state.identity.find_user_by_email(&req.email) {
        let reset_token = generate_email_token()?;
        user.reset_token = Some(reset_token.clone());
        user.reset_token_expires_at = Some(Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS));
        user.updated_at = Utc::now();
        let email = user.email.clone();
        state.identity.save_user(user);

        let reset_url = format!(
            "{}/reset-password?token={}",
            state.config.client_url.trim_end_matches('/'),
            reset_token
        );
        if let Err(e) = state.dispatcher.send_password_reset(&email, &reset_url).await {
            tracing::warn!(error = ?e, "password reset email failed to send");
        }
    }

    Ok(empty_success("If the account exists, a reset link has been sent").into_response())
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Response, AppError> {
    if req.password.is_empty() {
        return Err(AppError::ValidationError("password is required".to_string()));
    }
    let mut user = state
        .identity
        .find_user_by_reset_token(&req.token)
        .filter(|u| {
            u.reset_token_expires_at
                .map(|expires| expires > Utc::now())
                .unwrap_or(false)
        })
        .ok_or_else(|| AppError::ValidationError("Invalid or expired token".to_string()))?;

    user.password_hash = hash_password(&req.password)?;
    user.reset_token = None;
    user.reset_token_expires_at = None;
    user.updated_at = Utc::now();
    state.identity.save_user(user);

    Ok(empty_success("Password reset").into_response())
}
