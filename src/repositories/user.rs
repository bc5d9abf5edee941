use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use crate::{
    error::{AppError, Result},
    models::user::{PublicUser, User},
};

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        password_hash: row.try_get("password_hash").map_err(|_| AppError::MissingData("password_hash".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// A helper function to map a `tokio_postgres::Row` to a `PublicUser`.
fn row_to_public_user(row: &Row) -> Result<PublicUser> {
    Ok(PublicUser {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Finds a user by their email address.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
            &[&email],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Creates a new user row.
pub async fn create_user(
    pool: &Pool,
    email: &str,
    password_hash: &str,
    username: &str,
) -> Result<PublicUser> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO users (email, password_hash, username)
            VALUES ($1, $2, $3)
            RETURNING id, email, username, created_at
            "#,
            &[&email, &password_hash, &username],
        )
        .await?;
    row_to_public_user(&row)
}

/// Checks whether an email address belongs to a user other than `user_id`.
pub async fn email_taken_by_other(pool: &Pool, email: &str, user_id: i32) -> Result<bool> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id
            FROM users
            WHERE email = $1 AND id != $2
            "#,
            &[&email, &user_id],
        )
        .await?;
    Ok(row.is_some())
}

/// The set of profile columns to rewrite.
///
/// Outer `None` means "leave the column untouched"; `Some(None)` writes SQL
/// NULL. The password arrives pre-hashed and can only be set, not cleared.
#[derive(Default, Debug)]
pub struct ProfileChanges {
    pub display_name: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
    pub wallpaper_url: Option<Option<String>>,
    pub theme: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub password_hash: Option<String>,
}

/// Builds a numbered `SET` clause for the given columns, starting at `$1`.
fn numbered_set_clause(columns: &[&str]) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Applies a partial profile update.
///
/// Only the supplied columns are written; the statement is assembled
/// dynamically with bound parameters. Returns `false` when no column was
/// supplied and no statement was issued.
pub async fn update_profile(pool: &Pool, user_id: i32, changes: &ProfileChanges) -> Result<bool> {
    let mut columns: Vec<&str> = Vec::new();
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

    if let Some(value) = &changes.display_name {
        columns.push("display_name");
        params.push(value);
    }
    if let Some(value) = &changes.avatar_url {
        columns.push("avatar_url");
        params.push(value);
    }
    if let Some(value) = &changes.wallpaper_url {
        columns.push("wallpaper_url");
        params.push(value);
    }
    if let Some(value) = &changes.theme {
        columns.push("theme");
        params.push(value);
    }
    if let Some(value) = &changes.email {
        columns.push("email");
        params.push(value);
    }
    if let Some(value) = &changes.password_hash {
        columns.push("password_hash");
        params.push(value);
    }

    if columns.is_empty() {
        return Ok(false);
    }

    let statement = format!(
        "UPDATE users SET {} WHERE id = ${}",
        numbered_set_clause(&columns),
        params.len() + 1
    );
    params.push(&user_id);

    let client = pool.get().await?;
    client.execute(statement.as_str(), &params).await?;
    Ok(true)
}

/// Deletes an account and everything it owns.
///
/// Sessions, then files, then the user row, in one transaction.
pub async fn delete_account(pool: &Pool, user_id: i32) -> Result<()> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;
    tx.execute("DELETE FROM sessions WHERE user_id = $1", &[&user_id])
        .await?;
    tx.execute("DELETE FROM files WHERE user_id = $1", &[&user_id])
        .await?;
    tx.execute("DELETE FROM users WHERE id = $1", &[&user_id])
        .await?;
    tx.commit().await?;
    Ok(())
}
