use std::sync::Arc;

use async_trait::async_trait;

use crate::{entities::contact_me::ContactNotification, errors::NotifyError};

/// Side channel told about every accepted submission.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    /// Delivers the notification, returning a status message on success
    async fn notify(&self, notification: &ContactNotification) -> Result<String, NotifyError>;
}

#[async_trait]
impl<T> ContactNotifier for Arc<T>
where
    T: ContactNotifier + ?Sized,
{
    async fn notify(&self, notification: &ContactNotification) -> Result<String, NotifyError> {
        (**self).notify(notification).await
    }
}
