use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::{
    error::{AppError, Result},
    models::contact::ContactMessage,
};

/// A helper function to map a `tokio_postgres::Row` to a `ContactMessage`.
fn row_to_message(row: &Row) -> Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        name: row.try_get("name").map_err(|_| AppError::MissingData("name".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        subject: row.try_get("subject").map_err(|_| AppError::MissingData("subject".to_string()))?,
        message: row.try_get("message").map_err(|_| AppError::MissingData("message".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
        is_read: row.try_get("is_read").map_err(|_| AppError::MissingData("is_read".to_string()))?,
        replied_at: row.try_get("replied_at").map_err(|_| AppError::MissingData("replied_at".to_string()))?,
    })
}

/// Inserts a submission and returns its assigned id.
pub async fn insert_message(
    pool: &Pool,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<i32> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO contact_messages (name, email, subject, message, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id
            "#,
            &[&name, &email, &subject, &message],
        )
        .await?;
    row.try_get("id")
        .map_err(|_| AppError::MissingData("id".to_string()))
}

/// Lists every message, newest first. No pagination.
pub async fn list_messages(pool: &Pool) -> Result<Vec<ContactMessage>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT id, name, email, subject, message, created_at, is_read, replied_at
            FROM contact_messages
            ORDER BY created_at DESC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_message).collect()
}

/// Flags a message as read. A missing id is a silent no-op.
pub async fn mark_read(pool: &Pool, id: i32) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute(
            "UPDATE contact_messages SET is_read = TRUE WHERE id = $1",
            &[&id],
        )
        .await?;
    Ok(())
}

/// Checks whether a message exists.
pub async fn message_exists(pool: &Pool, id: i32) -> Result<bool> {
    let client = pool.get().await?;
    let row = client
        .query_opt("SELECT id FROM contact_messages WHERE id = $1", &[&id])
        .await?;
    Ok(row.is_some())
}

/// Records the reply instant. The reply text itself is not stored.
pub async fn record_reply(pool: &Pool, id: i32) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute(
            "UPDATE contact_messages SET replied_at = NOW() WHERE id = $1",
            &[&id],
        )
        .await?;
    Ok(())
}

/// Deletes a message. A missing id is a silent no-op.
pub async fn delete_message(pool: &Pool, id: i32) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute("DELETE FROM contact_messages WHERE id = $1", &[&id])
        .await?;
    Ok(())
}
