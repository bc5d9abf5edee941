use chrono::{DateTime, Utc};
use serde::Serialize;

/// A contact-form submission.
///
/// Messages are not tied to any user; every valid auth session may manage
/// the whole inbox.
#[derive(Serialize, Clone, Debug)]
pub struct ContactMessage {
    /// The unique identifier for the message.
    pub id: i32,
    /// The sender's name.
    pub name: String,
    /// The sender's email address.
    pub email: String,
    /// The message subject.
    pub subject: String,
    /// The message body.
    pub message: String,
    /// The timestamp when the message was received.
    pub created_at: DateTime<Utc>,
    /// Whether the message has been marked read.
    pub is_read: bool,
    /// The timestamp of the reply, if one was recorded.
    pub replied_at: Option<DateTime<Utc>>,
}
