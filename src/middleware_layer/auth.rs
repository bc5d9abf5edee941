use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, Result},
    models::session::{AuthSession, ProfileSession},
    repositories::session as session_repo,
    state::AppState,
};

/// The bearer header consumed by the auth, contact, files and user-data
/// components.
const AUTH_TOKEN_HEADER: &str = "x-auth-token";
/// The bearer header consumed by the profile component only. The two
/// namespaces are deliberately distinct; existing clients depend on which
/// header each endpoint reads.
const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Extracts a token header from the request, if present.
///
/// Header lookup is case-insensitive, so any casing the client sends
/// matches.
fn header_token(request: &Request<Body>, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// A middleware gating a route group on a valid `X-Auth-Token` resolved
/// against the `sessions` table.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = header_token(&request, AUTH_TOKEN_HEADER).ok_or_else(|| {
        tracing::warn!("❌ Missing {} header", AUTH_TOKEN_HEADER);
        AppError::Authentication("Authentication required".to_string())
    })?;

    let user_id = session_repo::find_user_id(&state.db, &token)
        .await?
        .ok_or_else(|| {
            tracing::warn!("❌ Auth token did not resolve to a live session");
            AppError::Authentication("Invalid or expired token".to_string())
        })?;

    tracing::debug!("✅ Authenticated user: {}", user_id);

    request.extensions_mut().insert(AuthSession { user_id });

    Ok(next.run(request).await)
}

/// A middleware gating the user-data routes on a valid `X-Auth-Token`
/// resolved against the legacy `user_sessions` table.
pub async fn require_data_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = header_token(&request, AUTH_TOKEN_HEADER).ok_or_else(|| {
        tracing::warn!("❌ Missing {} header", AUTH_TOKEN_HEADER);
        AppError::Authentication("No auth token provided".to_string())
    })?;

    let user_id = session_repo::find_data_user_id(&state.db, &token)
        .await?
        .ok_or_else(|| {
            tracing::warn!("❌ Token did not resolve in the user_sessions namespace");
            AppError::Authentication("Invalid or expired token".to_string())
        })?;

    tracing::debug!("✅ Authenticated user (user-data): {}", user_id);

    request.extensions_mut().insert(AuthSession { user_id });

    Ok(next.run(request).await)
}

/// A middleware gating the profile routes on a valid `X-Session-Token`,
/// resolving the whole profile row up front.
pub async fn require_profile_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = header_token(&request, SESSION_TOKEN_HEADER).ok_or_else(|| {
        tracing::warn!("❌ Missing {} header", SESSION_TOKEN_HEADER);
        AppError::Authentication("Session token required".to_string())
    })?;

    let profile = session_repo::find_profile(&state.db, &token)
        .await?
        .ok_or_else(|| {
            tracing::warn!("❌ Session token did not resolve to a live session");
            AppError::Authentication("Invalid or expired session".to_string())
        })?;

    tracing::debug!("✅ Profile session for user: {}", profile.id);

    request.extensions_mut().insert(ProfileSession { profile });

    Ok(next.run(request).await)
}
