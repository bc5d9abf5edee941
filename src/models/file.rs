use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored file record.
///
/// The payload itself is embedded in `file_url` as a base64 data URI, so
/// the row carries the entire file. There is no external blob store.
#[derive(Serialize, Clone, Debug)]
pub struct StoredFile {
    /// The unique identifier for the file.
    pub id: i32,
    /// The generated unique storage name (`{uuid}_{original}`).
    pub filename: String,
    /// The filename supplied by the uploader.
    pub original_filename: String,
    /// The declared file type.
    pub file_type: String,
    /// The decoded payload size in bytes.
    pub file_size: i64,
    /// The full payload as a `data:{mime};base64,{content}` URI.
    pub file_url: String,
    /// The declared MIME type.
    pub mime_type: String,
    /// The timestamp when the file was uploaded.
    pub created_at: DateTime<Utc>,
}
