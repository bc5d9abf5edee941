use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::contact::ContactMessage,
    repositories::contact as contact_repo,
    services::mailer::{self, ContactNotification},
    state::AppState,
    validation::contact::validate_submission,
};

/// The subject used when a submission omits one.
const DEFAULT_SUBJECT: &str = "New message";

/// The request payload for a public contact submission.
#[derive(Deserialize, Debug)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// The request payload for replying to a message.
#[derive(Deserialize, Debug)]
pub struct ReplyRequest {
    #[serde(default)]
    pub message: String,
}

/// The response payload for a successful submission.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub id: i32,
}

/// The response payload for inbox mutations.
#[derive(Serialize)]
pub struct StatusResponse {
    pub success: bool,
}

/// Handles a public contact-form submission.
///
/// The admin notification is best effort: the submission has already been
/// stored, and a relay failure never changes the response.
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse> {
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_string();
    let subject = payload
        .subject
        .as_deref()
        .unwrap_or(DEFAULT_SUBJECT)
        .trim()
        .to_string();
    let message = payload.message.trim().to_string();

    validate_submission(&name, &email, &message)?;

    let id = contact_repo::insert_message(&state.db, &name, &email, &subject, &message).await?;
    tracing::info!("📨 Contact message {} received from {}", id, email);

    mailer::notify_admin(
        &state.config,
        ContactNotification {
            id,
            name: &name,
            email: &email,
            subject: &subject,
            message: &message,
        },
    )
    .await;

    Ok(Json(SubmitResponse {
        success: true,
        message: "Message received successfully".to_string(),
        id,
    }))
}

/// Lists the whole inbox, newest first.
#[axum::debug_handler]
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>> {
    Ok(Json(contact_repo::list_messages(&state.db).await?))
}

/// Marks a message read. A missing id is a silent no-op.
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StatusResponse>> {
    contact_repo::mark_read(&state.db, id).await?;
    Ok(Json(StatusResponse { success: true }))
}

/// Records a reply to a message.
///
/// Only the reply instant is persisted; the text is not stored or
/// delivered to the original sender. Unlike the other mutations this one
/// checks existence first.
#[axum::debug_handler]
pub async fn reply(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ReplyRequest>,
) -> Result<Json<StatusResponse>> {
    if !contact_repo::message_exists(&state.db, id).await? {
        return Err(AppError::NotFound("Message not found".to_string()));
    }

    contact_repo::record_reply(&state.db, id).await?;
    tracing::info!(
        "✉️ Reply recorded for message {} ({} chars, not delivered)",
        id,
        payload.message.len()
    );

    Ok(Json(StatusResponse { success: true }))
}

/// Deletes a message. A missing id is a silent no-op.
#[axum::debug_handler]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StatusResponse>> {
    contact_repo::delete_message(&state.db, id).await?;
    Ok(Json(StatusResponse { success: true }))
}
