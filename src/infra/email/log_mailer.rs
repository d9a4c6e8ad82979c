// Mailer that writes outgoing email to the log instead of a provider.
//
// Used until a delivery provider is configured; operators can read the
// rendered subject and links straight from the server output.

use crate::core::email::{EmailError, Mailer, OutgoingEmail};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct LogMailer {
    sent: AtomicU64,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, EmailError> {
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("log-{}", n);
        tracing::info!(
            id = %id,
            from = %email.from,
            to = %email.to,
            reply_to = email.reply_to.as_deref().unwrap_or("-"),
            subject = %email.subject,
            html_bytes = email.html.len(),
            "Email delivery is log-only"
        );
        tracing::debug!(id = %id, html = %email.html, "Email body");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_numbers_messages() {
        let mailer = LogMailer::new();
        let email = OutgoingEmail {
            from: "StatIQ <noreply@usestatiq.com>".to_string(),
            to: "coach@joshua.edu".to_string(),
            reply_to: None,
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        assert_eq!(mailer.send(&email).await.unwrap(), "log-1");
        assert_eq!(mailer.send(&email).await.unwrap(), "log-2");
    }
}
