use crate::error::{AppError, Result};

/// Validates a contact submission's required fields, already trimmed.
///
/// # Arguments
///
/// * `name` - The trimmed sender name.
/// * `email` - The trimmed sender email.
/// * `message` - The trimmed message body.
///
/// # Returns
///
/// A `Result<()>` indicating whether the submission is acceptable.
pub fn validate_submission(name: &str, email: &str, message: &str) -> Result<()> {
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(AppError::Validation(
            "Name, email and message are required".to_string(),
        ));
    }

    Ok(())
}
