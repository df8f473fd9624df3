use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::Message;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Serialize)]
struct ConversationView {
    id: Uuid,
    name: String,
    user_id: Option<Uuid>,
    last_message: String,
    unread_count: usize,
}

pub async fn list_conversations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let conversations: Vec<ConversationView> = state
        .messages
        .conversations_for(user.id)
        .into_iter()
        .map(|c| {
            let other_id = c.other_participant(user.id);
            let name = other_id
                .and_then(|id| state.identity.find_user(id))
                .map(|u| u.name)
                .unwrap_or_else(|| "Customer".to_string());
            ConversationView {
                id: c.id,
                name,
                user_id: other_id,
                last_message: c.last_message.clone(),
                unread_count: state.messages.unread_count(c.id, user.id),
            }
        })
        .collect();

    success(conversations, "Conversations fetched").into_response()
}

pub async fn conversation_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Response {
    let messages = state
        .messages
        .find_conversation_between(user.id, user_id)
        .map(|c| state.messages.messages_in(c.id))
        .unwrap_or_default();
    success(messages, "Messages fetched").into_response()
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    pub content: String,
}

pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SendMessageRequest>,
) -> Result<Response, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::ValidationError("content is required".to_string()));
    }
    if state.identity.find_user(req.recipient_id).is_none() {
        return Err(AppError::NotFound("Recipient not found".to_string()));
    }
    if req.recipient_id == user.id {
        return Err(AppError::ValidationError(
            "cannot message yourself".to_string(),
        ));
    }

    let conversation = state
        .messages
        .find_or_create_conversation(user.id, req.recipient_id);
    let message = state.messages.append(Message {
        id: Uuid::new_v4(),
        conversation_id: conversation.id,
        sender_id: user.id,
        recipient_id: req.recipient_id,
        content: req.content,
        is_read: false,
        created_at: Utc::now(),
    });

    Ok(created(message, "Message sent").into_response())
}

pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(message_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !state.messages.mark_read(message_id, user.id) {
        return Err(AppError::NotFound("Message not found".to_string()));
    }
    Ok(empty_success("Read").into_response())
}
