use async_trait::async_trait;

use crate::{
    entities::contact_me::ContactNotification, errors::NotifyError,
    repositories::notifier::ContactNotifier,
};

use super::subject_for;

const PREVIEW_CHARS: usize = 100;

/// Writes the notification to the log instead of sending it anywhere.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    recipient: String,
}

impl LogNotifier {
    pub fn new(recipient: &str) -> Self {
        LogNotifier {
            recipient: recipient.to_string(),
        }
    }
}

#[async_trait]
impl ContactNotifier for LogNotifier {
    async fn notify(&self, notification: &ContactNotification) -> Result<String, NotifyError> {
        let preview: String = notification.message.chars().take(PREVIEW_CHARS).collect();

        tracing::info!(
            to = %self.recipient,
            subject = %subject_for(&notification.name),
            from = %format!("{} <{}>", notification.name, notification.email),
            submitted_at = %notification.submitted_at.to_rfc3339(),
            preview = %preview,
            "Contact notification"
        );

        Ok("Notification logged".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn logging_always_succeeds() {
        let notifier = LogNotifier::new("inbox@example.com");
        let notification = ContactNotification {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "x".repeat(500),
            submitted_at: Utc::now(),
        };

        let result = notifier.notify(&notification).await;
        assert_eq!(result.unwrap(), "Notification logged");
    }
}
