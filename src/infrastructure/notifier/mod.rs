pub mod log_notifier;
pub mod webhook;

use std::sync::Arc;

use crate::{repositories::notifier::ContactNotifier, settings::AppConfig};

pub use log_notifier::LogNotifier;
pub use webhook::WebhookNotifier;

const SUBJECT_PREFIX: &str = "[Contact]";

pub fn subject_for(name: &str) -> String {
    format!("{SUBJECT_PREFIX} New message from {name}")
}

/// Picks the webhook notifier when a URL is configured, otherwise logs.
pub fn from_config(config: &AppConfig) -> Arc<dyn ContactNotifier> {
    match config.notify_webhook_url.as_deref() {
        Some(url) => match WebhookNotifier::new(url, &config.notify_recipient, config.notify_timeout()) {
            Ok(notifier) => {
                tracing::info!("Contact notifications will be posted to the configured webhook");
                Arc::new(notifier)
            }
            Err(e) => {
                tracing::error!("Webhook notifier unavailable, falling back to logs: {}", e);
                Arc::new(LogNotifier::new(&config.notify_recipient))
            }
        },
        None => Arc::new(LogNotifier::new(&config.notify_recipient)),
    }
}
