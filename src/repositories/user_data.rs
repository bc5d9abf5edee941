use deadpool_postgres::Pool;
use serde_json::Value;

use crate::{
    error::{AppError, Result},
    models::user_data::UserData,
};

/// Fetches the stored arrays for a user, if a row exists.
pub async fn fetch(pool: &Pool, user_id: i32) -> Result<Option<UserData>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT platforms, games
            FROM user_data
            WHERE user_id = $1
            "#,
            &[&user_id],
        )
        .await?;
    row.map(|r| {
        let platforms: Option<Value> = r
            .try_get("platforms")
            .map_err(|_| AppError::MissingData("platforms".to_string()))?;
        let games: Option<Value> = r
            .try_get("games")
            .map_err(|_| AppError::MissingData("games".to_string()))?;
        Ok(UserData {
            platforms: platforms.unwrap_or_else(|| Value::Array(Vec::new())),
            games: games.unwrap_or_else(|| Value::Array(Vec::new())),
        })
    })
    .transpose()
}

/// Replaces both arrays for a user in one upsert.
///
/// Last write wins; there is no merge and no concurrency check beyond the
/// upsert's own atomicity.
pub async fn upsert(pool: &Pool, user_id: i32, platforms: &Value, games: &Value) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute(
            r#"
            INSERT INTO user_data (user_id, platforms, games)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET platforms = EXCLUDED.platforms, games = EXCLUDED.games, updated_at = NOW()
            "#,
            &[&user_id, &platforms, &games],
        )
        .await?;
    Ok(())
}
