use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{
    entities::contact_me::ContactNotification, errors::NotifyError,
    repositories::notifier::ContactNotifier,
};

use super::subject_for;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    recipient: &'a str,
    subject: String,
    #[serde(flatten)]
    contact: &'a ContactNotification,
}

/// Posts each notification as JSON to an HTTP endpoint (mail relay, chat
/// hook, ...). One attempt per submission, no retries.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    recipient: String,
}

impl WebhookNotifier {
    pub fn new(url: &str, recipient: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(WebhookNotifier {
            client,
            url: url.to_string(),
            recipient: recipient.to_string(),
        })
    }
}

#[async_trait]
impl ContactNotifier for WebhookNotifier {
    async fn notify(&self, notification: &ContactNotification) -> Result<String, NotifyError> {
        let payload = WebhookPayload {
            recipient: &self.recipient,
            subject: subject_for(&notification.name),
            contact: notification,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(format!("Notification delivered ({})", status.as_u16()))
        } else {
            Err(NotifyError::Rejected(status.as_u16()))
        }
    }
}
