use chrono::{DateTime, Utc};
use serde::Serialize;

/// A full credential row, as read for login.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i32,
    /// The user's email address.
    pub email: String,
    /// The user's display username.
    pub username: Option<String>,
    /// The stored password credential (`hash:salt` for accounts created
    /// through registration; a bare SHA-256 digest once rewritten by a
    /// profile password update).
    pub password_hash: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

/// The public shape of a user returned by register and login.
#[derive(Serialize, Clone, Debug)]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

/// The user shape resolved from a session token.
#[derive(Serialize, Clone, Debug)]
pub struct SessionUser {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
}

/// The profile fields owned by the profile component.
#[derive(Clone, Debug)]
pub struct Profile {
    pub id: i32,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub wallpaper_url: Option<String>,
    pub theme: Option<String>,
}
