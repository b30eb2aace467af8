use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Message;
use crate::state::AppState;

use super::client_identity;

// GET /api/messages?dashboard_id=…
#[derive(Deserialize)]
pub struct MessagesQuery {
    pub dashboard_id: String,
}

pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let conn = state.db.lock().unwrap();
    if queries::get_dashboard_by_id(&conn, &query.dashboard_id)?.is_none() {
        return Err(AppError::NotFound(format!(
            "dashboard {}",
            query.dashboard_id
        )));
    }

    let messages = queries::get_messages_for_dashboard(&conn, &query.dashboard_id)?;
    Ok(Json(messages))
}

// POST /api/messages
#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub dashboard_id: String,
    pub recipient_id: String,
    pub content: String,
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<Message>, AppError> {
    let sender_email = client_identity(&headers).ok_or(AppError::Unauthorized)?;

    let content = body.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("message content is empty".to_string()));
    }

    let conn = state.db.lock().unwrap();
    if queries::get_dashboard_by_id(&conn, &body.dashboard_id)?.is_none() {
        return Err(AppError::NotFound(format!(
            "dashboard {}",
            body.dashboard_id
        )));
    }
    if queries::get_user_by_id(&conn, &body.recipient_id)?.is_none() {
        return Err(AppError::NotFound(format!("user {}", body.recipient_id)));
    }

    let sender = queries::find_or_create_user(&conn, &sender_email, None)?;
    let message = Message {
        id: Uuid::new_v4().to_string(),
        dashboard_id: body.dashboard_id,
        sender_id: sender.id,
        recipient_id: body.recipient_id,
        content,
        is_read: false,
        created_at: Utc::now()
            .naive_utc()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    };
    queries::insert_message(&conn, &message)?;

    Ok(Json(message))
}

// POST /api/messages/read
#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub dashboard_id: String,
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<MarkReadRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let reader_email = client_identity(&headers).ok_or(AppError::Unauthorized)?;

    let conn = state.db.lock().unwrap();
    let reader = queries::get_user_by_email(&conn, &reader_email)?
        .ok_or_else(|| AppError::NotFound(format!("user {reader_email}")))?;
    let marked = queries::mark_messages_read(&conn, &body.dashboard_id, &reader.id)?;

    Ok(Json(serde_json::json!({ "success": true, "marked": marked })))
}
