use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::{
    error::{AppError, Result},
    models::file::StoredFile,
};

const FILE_COLUMNS: &str =
    "id, filename, original_filename, file_type, file_size, file_url, mime_type, created_at";

/// A helper function to map a `tokio_postgres::Row` to a `StoredFile`.
fn row_to_file(row: &Row) -> Result<StoredFile> {
    Ok(StoredFile {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        filename: row.try_get("filename").map_err(|_| AppError::MissingData("filename".to_string()))?,
        original_filename: row.try_get("original_filename").map_err(|_| AppError::MissingData("original_filename".to_string()))?,
        file_type: row.try_get("file_type").map_err(|_| AppError::MissingData("file_type".to_string()))?,
        file_size: row.try_get("file_size").map_err(|_| AppError::MissingData("file_size".to_string()))?,
        file_url: row.try_get("file_url").map_err(|_| AppError::MissingData("file_url".to_string()))?,
        mime_type: row.try_get("mime_type").map_err(|_| AppError::MissingData("mime_type".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Creates a new file record carrying the full inline payload.
#[allow(clippy::too_many_arguments)]
pub async fn insert_file(
    pool: &Pool,
    user_id: i32,
    filename: &str,
    original_filename: &str,
    file_type: &str,
    file_size: i64,
    file_url: &str,
    mime_type: &str,
) -> Result<StoredFile> {
    let client = pool.get().await?;
    let statement = format!(
        r#"
        INSERT INTO files (user_id, filename, original_filename, file_type, file_size, file_url, mime_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {FILE_COLUMNS}
        "#
    );
    let row = client
        .query_one(
            statement.as_str(),
            &[
                &user_id,
                &filename,
                &original_filename,
                &file_type,
                &file_size,
                &file_url,
                &mime_type,
            ],
        )
        .await?;
    row_to_file(&row)
}

/// Lists a user's files, newest first.
pub async fn list_by_user(pool: &Pool, user_id: i32) -> Result<Vec<StoredFile>> {
    let client = pool.get().await?;
    let statement = format!(
        r#"
        SELECT {FILE_COLUMNS}
        FROM files
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    );
    let rows = client.query(statement.as_str(), &[&user_id]).await?;
    rows.iter().map(row_to_file).collect()
}

/// Finds a file by id, scoped to its owner.
pub async fn find_by_id(pool: &Pool, file_id: i32, user_id: i32) -> Result<Option<StoredFile>> {
    let client = pool.get().await?;
    let statement = format!(
        r#"
        SELECT {FILE_COLUMNS}
        FROM files
        WHERE id = $1 AND user_id = $2
        "#
    );
    let row = client
        .query_opt(statement.as_str(), &[&file_id, &user_id])
        .await?;
    row.map(|r| row_to_file(&r)).transpose()
}
