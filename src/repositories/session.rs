use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::{
    error::{AppError, Result},
    models::user::{Profile, SessionUser},
};

/// A helper function to map a `tokio_postgres::Row` to a `Profile`.
fn row_to_profile(row: &Row) -> Result<Profile> {
    Ok(Profile {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        display_name: row.try_get("display_name").map_err(|_| AppError::MissingData("display_name".to_string()))?,
        avatar_url: row.try_get("avatar_url").map_err(|_| AppError::MissingData("avatar_url".to_string()))?,
        wallpaper_url: row.try_get("wallpaper_url").map_err(|_| AppError::MissingData("wallpaper_url".to_string()))?,
        theme: row.try_get("theme").map_err(|_| AppError::MissingData("theme".to_string()))?,
    })
}

/// Inserts a new session row for a user.
pub async fn create_session(
    pool: &Pool,
    user_id: i32,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute(
            r#"
            INSERT INTO sessions (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            "#,
            &[&user_id, &token, &expires_at],
        )
        .await?;
    Ok(())
}

/// Resolves an unexpired auth token to its user id.
pub async fn find_user_id(pool: &Pool, token: &str) -> Result<Option<i32>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT user_id
            FROM sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
            &[&token],
        )
        .await?;
    row.map(|r| {
        r.try_get("user_id")
            .map_err(|_| AppError::MissingData("user_id".to_string()))
    })
    .transpose()
}

/// Resolves an unexpired auth token to the joined user record.
pub async fn find_session_user(pool: &Pool, token: &str) -> Result<Option<SessionUser>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT u.id, u.email, u.username
            FROM users u
            JOIN sessions s ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
            &[&token],
        )
        .await?;
    row.map(|r| {
        Ok(SessionUser {
            id: r.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
            email: r.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
            username: r.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        })
    })
    .transpose()
}

/// Resolves an unexpired profile session token to the full profile row.
pub async fn find_profile(pool: &Pool, token: &str) -> Result<Option<Profile>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT u.id, u.email, u.display_name, u.avatar_url, u.wallpaper_url, u.theme
            FROM users u
            JOIN sessions s ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
            &[&token],
        )
        .await?;
    row.map(|r| row_to_profile(&r)).transpose()
}

/// Resolves an unexpired token from the legacy `user_sessions` namespace.
///
/// Nothing in this system writes that table; it is consumed only by the
/// user-data gate and is not interchangeable with `sessions`.
pub async fn find_data_user_id(pool: &Pool, token: &str) -> Result<Option<i32>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT user_id
            FROM user_sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
            &[&token],
        )
        .await?;
    row.map(|r| {
        r.try_get("user_id")
            .map_err(|_| AppError::MissingData("user_id".to_string()))
    })
    .transpose()
}
