use crate::error::{AppError, Result};

/// Validates that both credential fields were supplied and non-empty.
///
/// # Arguments
///
/// * `email` - The email field, if present in the payload.
/// * `password` - The password field, if present in the payload.
///
/// # Returns
///
/// A `Result` containing the owned `(email, password)` pair.
pub fn validate_credentials(
    email: Option<&str>,
    password: Option<&str>,
) -> Result<(String, String)> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok((email.to_string(), password.to_string()))
        }
        _ => Err(AppError::Validation(
            "Email and password are required".to_string(),
        )),
    }
}
