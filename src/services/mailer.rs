use chrono::Utc;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::MultiPart,
};

use crate::config::Config;
use crate::error::{AppError, Result};

/// The sender address stamped on notification emails.
const FROM_ADDRESS: &str = "noreply@streamhub.com";

/// A contact submission to notify the administrator about.
pub struct ContactNotification<'a> {
    pub id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

/// Formats the plain-text half of the notification.
fn format_text_body(n: &ContactNotification<'_>, timestamp: &str) -> String {
    format!(
        "New message from the site:\n\n\
         From: {} ({})\n\
         Subject: {}\n\n\
         Message:\n{}\n\n\
         ---\n\
         ID: {}\n\
         Time: {}\n",
        n.name, n.email, n.subject, n.message, n.id, timestamp
    )
}

/// Formats the HTML half of the notification.
fn format_html_body(n: &ContactNotification<'_>, timestamp: &str) -> String {
    format!(
        "<html>\n<body>\n\
         <h2>New message from the site</h2>\n\
         <p><strong>From:</strong> {} ({})</p>\n\
         <p><strong>Subject:</strong> {}</p>\n\
         <hr>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{}</p>\n\
         <hr>\n\
         <p style=\"color: #888; font-size: 12px;\">ID: {} | Time: {}</p>\n\
         </body>\n</html>",
        n.name,
        n.email,
        n.subject,
        n.message.replace('\n', "<br>"),
        n.id,
        timestamp
    )
}

/// Sends the multipart notification through the configured relay.
async fn send(config: &Config, admin_email: &str, n: &ContactNotification<'_>) -> Result<()> {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let email = Message::builder()
        .from(
            FROM_ADDRESS
                .parse()
                .map_err(|e| AppError::Internal(format!("Invalid sender address: {}", e)))?,
        )
        .to(admin_email
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid admin address: {}", e)))?)
        .subject(format!("[Contact] {}", n.subject))
        .multipart(MultiPart::alternative_plain_html(
            format_text_body(n, &timestamp),
            format_html_body(n, &timestamp),
        ))
        .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_server)
        .port(config.smtp_port)
        .build();

    mailer
        .send(email)
        .await
        .map_err(|e| AppError::Internal(format!("SMTP send failed: {}", e)))?;

    Ok(())
}

/// Notifies the administrator about a contact submission.
///
/// Best effort: skipped when no admin address is configured, and any
/// failure is logged and swallowed so the submission response is never
/// affected.
pub async fn notify_admin(config: &Config, n: ContactNotification<'_>) {
    let Some(admin_email) = config.admin_email.as_deref() else {
        tracing::debug!("No ADMIN_EMAIL configured, skipping contact notification");
        return;
    };

    match send(config, admin_email, &n).await {
        Ok(()) => {
            tracing::info!("✅ Contact notification sent for message {}", n.id);
        }
        Err(e) => {
            tracing::warn!("Email sending failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContactNotification<'static> {
        ContactNotification {
            id: 7,
            name: "Alice",
            email: "alice@example.com",
            subject: "Hello",
            message: "line one\nline two",
        }
    }

    #[test]
    fn text_body_carries_all_fields() {
        let body = format_text_body(&sample(), "2026-01-01 00:00:00");
        assert!(body.contains("Alice (alice@example.com)"));
        assert!(body.contains("Subject: Hello"));
        assert!(body.contains("line one\nline two"));
        assert!(body.contains("ID: 7"));
    }

    #[test]
    fn html_body_breaks_lines() {
        let body = format_html_body(&sample(), "2026-01-01 00:00:00");
        assert!(body.contains("line one<br>line two"));
        assert!(body.contains("<strong>From:</strong> Alice (alice@example.com)"));
        assert!(body.contains("ID: 7 | Time: 2026-01-01 00:00:00"));
    }
}
