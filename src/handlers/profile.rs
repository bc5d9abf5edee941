use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{AppError, Result},
    models::{session::ProfileSession, user::Profile},
    repositories::user as user_repo,
    repositories::user::ProfileChanges,
    services::auth as auth_service,
    state::AppState,
};

/// The theme reported when a user never picked one.
const DEFAULT_THEME: &str = "system";

/// Deserializes a field so that an absent key and an explicit `null` stay
/// distinguishable: absent stays `None`, `null` becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The request payload for a partial profile update.
///
/// Every field is independently optional; a key present with `null` clears
/// the column, while an absent key leaves it untouched.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub wallpaper_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub theme: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    pub password: Option<String>,
}

/// The profile shape returned to clients.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i32,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub wallpaper_url: Option<String>,
    pub theme: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            display_name: profile.display_name,
            avatar_url: profile.avatar_url,
            wallpaper_url: profile.wallpaper_url,
            theme: profile
                .theme
                .filter(|theme| !theme.is_empty())
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
        }
    }
}

/// The response payload for profile mutations.
#[derive(Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
}

/// Returns the caller's profile.
#[axum::debug_handler]
pub async fn get_profile(
    Extension(session): Extension<ProfileSession>,
) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(session.profile))
}

/// Applies a partial profile update.
///
/// A payload with no recognized field is still a success; nothing is
/// written.
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<ProfileSession>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateResponse>> {
    let user_id = session.profile.id;

    if let Some(Some(new_email)) = &payload.email {
        if user_repo::email_taken_by_other(&state.db, new_email, user_id).await? {
            return Err(AppError::Validation("Email already in use".to_string()));
        }
    }

    let changes = ProfileChanges {
        display_name: payload.display_name,
        avatar_url: payload.avatar_url,
        wallpaper_url: payload.wallpaper_url,
        theme: payload.theme,
        email: payload.email,
        password_hash: payload
            .password
            .as_deref()
            .map(auth_service::profile_password_hash),
    };

    if user_repo::update_profile(&state.db, user_id, &changes).await? {
        tracing::info!("✅ Profile updated for user {}", user_id);
    }

    Ok(Json(UpdateResponse {
        success: true,
        message: "Profile updated".to_string(),
    }))
}

/// Deletes the caller's account.
///
/// Sessions, files and the user row go together; every outstanding token
/// dies with the account.
#[axum::debug_handler]
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(session): Extension<ProfileSession>,
) -> Result<Json<UpdateResponse>> {
    let user_id = session.profile.id;
    user_repo::delete_account(&state.db, user_id).await?;
    tracing::info!("🗑️ Account deleted: {}", user_id);

    Ok(Json(UpdateResponse {
        success: true,
        message: "Account deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_fields_stay_distinguishable() {
        let absent: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.display_name.is_none());
        assert!(absent.email.is_none());

        let cleared: UpdateProfileRequest =
            serde_json::from_str(r#"{"avatarUrl": null}"#).unwrap();
        assert_eq!(cleared.avatar_url, Some(None));
        assert!(cleared.wallpaper_url.is_none());

        let set: UpdateProfileRequest =
            serde_json::from_str(r#"{"displayName": "Alice", "theme": "dark"}"#).unwrap();
        assert_eq!(set.display_name, Some(Some("Alice".to_string())));
        assert_eq!(set.theme, Some(Some("dark".to_string())));
    }

    #[test]
    fn camel_case_keys_are_required() {
        let snake: UpdateProfileRequest =
            serde_json::from_str(r#"{"display_name": "Alice"}"#).unwrap();
        // Unknown keys are ignored, not remapped.
        assert!(snake.display_name.is_none());
    }

    #[test]
    fn theme_defaults_to_system() {
        let profile = Profile {
            id: 1,
            email: "a@b.com".to_string(),
            display_name: None,
            avatar_url: None,
            wallpaper_url: None,
            theme: None,
        };
        assert_eq!(ProfileResponse::from(profile).theme, "system");

        let blank_theme = Profile {
            id: 2,
            email: "c@d.com".to_string(),
            display_name: None,
            avatar_url: None,
            wallpaper_url: None,
            theme: Some(String::new()),
        };
        assert_eq!(ProfileResponse::from(blank_theme).theme, "system");

        let chosen = Profile {
            id: 3,
            email: "e@f.com".to_string(),
            display_name: None,
            avatar_url: None,
            wallpaper_url: None,
            theme: Some("dark".to_string()),
        };
        assert_eq!(ProfileResponse::from(chosen).theme, "dark");
    }
}
