use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::user::{PublicUser, SessionUser},
    repositories::{session as session_repo, user as user_repo},
    services::auth as auth_service,
    state::AppState,
    validation::auth::validate_credentials,
};

/// The request payload for user registration.
#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

/// The request payload for user login.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The response payload for register and login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

/// The response payload for the identity self-check.
#[derive(Serialize)]
pub struct WhoamiResponse {
    pub authenticated: bool,
    pub user: SessionUser,
}

/// Derives a default username from the email's local part.
fn default_username(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

/// Issues a fresh session token for a user and persists it.
///
/// Prior tokens are left untouched; concurrent sessions are allowed.
async fn issue_session(state: &AppState, user_id: i32) -> Result<String> {
    let token = auth_service::generate_token();
    let expires_at = Utc::now() + chrono::Duration::days(state.config.session_duration_days);
    session_repo::create_session(&state.db, user_id, &token, expires_at).await?;
    Ok(token)
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let (email, password) =
        validate_credentials(payload.email.as_deref(), payload.password.as_deref())?;
    tracing::info!("📝 Register attempt: {}", email);

    let username = payload
        .username
        .unwrap_or_else(|| default_username(&email));

    if user_repo::find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let password_hash = auth_service::hash_password(&password)?;
    let user = user_repo::create_user(&state.db, &email, &password_hash, &username).await?;
    tracing::info!("✅ User registered: {}", user.id);

    let token = issue_session(&state, user.id).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (email, password) =
        validate_credentials(payload.email.as_deref(), payload.password.as_deref())?;
    tracing::info!("🔐 Login attempt: {}", email);

    let user = user_repo::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    let (stored_hash, salt) = auth_service::split_credential(&user.password_hash)?;
    if !auth_service::verify_password(&password, stored_hash, salt) {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    let token = issue_session(&state, user.id).await?;
    tracing::info!("✅ User logged in: {}", user.id);

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            user: PublicUser::from(&user),
            token,
        }),
    ))
}

/// Handles the token self-check.
///
/// Reads the auth token directly so the missing-token and invalid-token
/// rejections carry their own messages.
#[axum::debug_handler]
pub async fn whoami(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let token = headers
        .get("x-auth-token")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("No token provided".to_string()))?;

    let user = session_repo::find_session_user(&state.db, token)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_string()))?;

    Ok(Json(WhoamiResponse {
        authenticated: true,
        user,
    }))
}
