use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{file::StoredFile, session::AuthSession},
    repositories::file as file_repo,
    state::AppState,
};

/// The file type assumed when the uploader declares none.
const DEFAULT_FILE_TYPE: &str = "application/octet-stream";

/// The request payload for an upload. `content` is the base64-encoded file.
#[derive(Deserialize, Debug)]
pub struct UploadRequest {
    pub filename: Option<String>,
    pub content: Option<String>,
    pub file_type: Option<String>,
    pub mime_type: Option<String>,
}

/// Generates a collision-resistant storage name for an upload.
fn unique_filename(original: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), original)
}

/// Builds the inline data-URI payload stored in the file row.
fn build_data_uri(mime_type: &str, content_base64: &str) -> String {
    format!("data:{};base64,{}", mime_type, content_base64)
}

/// Handles a file upload.
///
/// The whole payload is persisted inline as a data URI, so the row grows
/// with the file.
#[axum::debug_handler]
pub async fn upload(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<UploadRequest>,
) -> Result<impl IntoResponse> {
    let filename = payload.filename.unwrap_or_default();
    let content = payload.content.unwrap_or_default();

    if filename.is_empty() || content.is_empty() {
        return Err(AppError::Validation(
            "Filename and content are required".to_string(),
        ));
    }

    let file_type = payload
        .file_type
        .unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string());
    let mime_type = payload.mime_type.unwrap_or_else(|| file_type.clone());

    let decoded = general_purpose::STANDARD
        .decode(content.as_bytes())
        .map_err(|_| AppError::Validation("Invalid file content".to_string()))?;
    let file_size = decoded.len() as i64;

    let stored_name = unique_filename(&filename);
    let file_url = build_data_uri(&mime_type, &content);

    let file = file_repo::insert_file(
        &state.db,
        session.user_id,
        &stored_name,
        &filename,
        &file_type,
        file_size,
        &file_url,
        &mime_type,
    )
    .await?;

    tracing::info!(
        "📁 File {} uploaded by user {} ({} bytes)",
        file.id,
        session.user_id,
        file_size
    );

    Ok((StatusCode::CREATED, Json(file)))
}

/// Lists the caller's files, newest first.
#[axum::debug_handler]
pub async fn list_files(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<StoredFile>>> {
    Ok(Json(file_repo::list_by_user(&state.db, session.user_id).await?))
}

/// Fetches one of the caller's files by id.
///
/// Foreign ids 404 the same way missing ones do; ownership is never
/// revealed.
#[axum::debug_handler]
pub async fn get_file(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<i32>,
) -> Result<Json<StoredFile>> {
    let file = file_repo::find_by_id(&state.db, id, session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
    Ok(Json(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_name_keeps_the_original_suffix() {
        let name = unique_filename("report.pdf");
        let (prefix, original) = name.split_once('_').unwrap();
        assert!(Uuid::parse_str(prefix).is_ok());
        assert_eq!(original, "report.pdf");
    }

    #[test]
    fn storage_names_do_not_collide() {
        assert_ne!(unique_filename("a.txt"), unique_filename("a.txt"));
    }

    #[test]
    fn data_uri_embeds_mime_and_payload() {
        let encoded = general_purpose::STANDARD.encode(b"hello");
        let uri = build_data_uri("text/plain", &encoded);
        assert_eq!(uri, format!("data:text/plain;base64,{}", encoded));

        // The embedded payload round-trips to the original bytes.
        let embedded = uri.split_once(";base64,").unwrap().1;
        assert_eq!(
            general_purpose::STANDARD.decode(embedded).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn declared_size_is_the_decoded_length() {
        let payload = vec![0u8; 1024];
        let encoded = general_purpose::STANDARD.encode(&payload);
        let decoded = general_purpose::STANDARD.decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.len(), 1024);
    }
}
