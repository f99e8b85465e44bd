//! Email delivery of analysis results.
//!
//! A thin notification sink: one plain-text message with a fixed subject,
//! sent over SMTP with STARTTLS and credential auth. Delivery failures are
//! the caller's to log; nothing here is retried, and a failed send never
//! affects the artifacts already on disk.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::env;
use std::error::Error;
use tracing::{info, instrument};

const SUBJECT: &str = "Claude News Analysis Results";

/// SMTP settings, sourced from the environment.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    /// Sender address, also the auth username.
    pub user: String,
    pub password: String,
    pub to: String,
}

impl EmailConfig {
    /// Read settings from `SMTP_SERVER`, `SMTP_PORT` (default 587),
    /// `EMAIL_USER`, `EMAIL_PASSWORD`, and `EMAIL_TO`.
    ///
    /// Returns `None` when any required variable is missing, which callers
    /// treat as "email not configured".
    pub fn from_env() -> Option<Self> {
        let smtp_server = env::var("SMTP_SERVER").ok()?;
        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);
        let user = env::var("EMAIL_USER").ok()?;
        let password = env::var("EMAIL_PASSWORD").ok()?;
        let to = env::var("EMAIL_TO").ok()?;
        Some(Self {
            smtp_server,
            smtp_port,
            user,
            password,
            to,
        })
    }
}

/// Build the analysis message for `config`.
fn build_message(config: &EmailConfig, body: &str) -> Result<Message, Box<dyn Error>> {
    Ok(Message::builder()
        .from(config.user.parse()?)
        .to(config.to.parse()?)
        .subject(SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())?)
}

/// Send the analysis text to the configured recipient.
///
/// # Errors
///
/// Auth and connection failures surface as errors; they are not retried.
#[instrument(level = "info", skip_all, fields(to = %config.to))]
pub fn send_analysis(config: &EmailConfig, body: &str) -> Result<(), Box<dyn Error>> {
    let message = build_message(config, body)?;

    let credentials = Credentials::new(config.user.clone(), config.password.clone());
    let transport = SmtpTransport::starttls_relay(&config.smtp_server)?
        .port(config.smtp_port)
        .credentials(credentials)
        .build();

    transport.send(&message)?;
    info!("Analysis email sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            user: "sender@example.com".to_string(),
            password: "app-password".to_string(),
            to: "editor@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_message() {
        let message = build_message(&config(), "analysis body").unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: Claude News Analysis Results"));
        assert!(formatted.contains("To: editor@example.com"));
        assert!(formatted.contains("analysis body"));
    }

    #[test]
    fn test_build_message_bad_address() {
        let mut bad = config();
        bad.to = "not an address".to_string();
        assert!(build_message(&bad, "body").is_err());
    }
}
