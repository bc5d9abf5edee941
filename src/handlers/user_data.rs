use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::Result,
    models::{session::AuthSession, user_data::UserData},
    repositories::user_data as user_data_repo,
    state::AppState,
};

fn empty_array() -> Value {
    Value::Array(Vec::new())
}

/// The request payload for a key/value write. Omitted arrays are written
/// as empty, not left alone: every write replaces both wholesale.
#[derive(Deserialize, Debug)]
pub struct SetUserDataRequest {
    #[serde(default = "empty_array")]
    pub platforms: Value,
    #[serde(default = "empty_array")]
    pub games: Value,
}

/// The response payload for a successful write.
#[derive(Serialize)]
pub struct SetUserDataResponse {
    pub success: bool,
}

/// Returns the caller's stored arrays, empty when nothing was stored yet.
#[axum::debug_handler]
pub async fn get_user_data(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<UserData>> {
    let data = user_data_repo::fetch(&state.db, session.user_id)
        .await?
        .unwrap_or_else(UserData::empty);
    Ok(Json(data))
}

/// Replaces the caller's stored arrays.
#[axum::debug_handler]
pub async fn set_user_data(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<SetUserDataRequest>,
) -> Result<Json<SetUserDataResponse>> {
    user_data_repo::upsert(&state.db, session.user_id, &payload.platforms, &payload.games)
        .await?;
    tracing::debug!("✅ User data replaced for user {}", session.user_id);

    Ok(Json(SetUserDataResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_arrays_default_to_empty() {
        let payload: SetUserDataRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.platforms, json!([]));
        assert_eq!(payload.games, json!([]));
    }

    #[test]
    fn supplied_arrays_pass_through_unchanged() {
        let payload: SetUserDataRequest = serde_json::from_value(json!({
            "platforms": [{"name": "PC"}],
            "games": ["Doom", "Quake"]
        }))
        .unwrap();
        assert_eq!(payload.platforms, json!([{"name": "PC"}]));
        assert_eq!(payload.games, json!(["Doom", "Quake"]));
    }

    #[test]
    fn empty_shape_serializes_as_empty_arrays() {
        let body = serde_json::to_value(UserData::empty()).unwrap();
        assert_eq!(body, json!({"platforms": [], "games": []}));
    }
}
