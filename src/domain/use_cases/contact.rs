use std::{sync::Arc, time::Duration};

use chrono::{NaiveTime, TimeDelta};
use validator::Validate;

use crate::{
    entities::contact_me::{
        ClientInfo, ContactMeForm, ContactMeResponse, ContactNotification, ContactStats,
        Submission, SubmissionFilter,
    },
    errors::{AppError, NotifyError},
    limiter::{clock::Clock, rate_limiter::SlidingWindowLimiter},
    repositories::{contact_me::SubmissionRepository, notifier::ContactNotifier},
    settings::AppConfig,
};

/// Per-client admission policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: usize,
    pub window: TimeDelta,
}

impl From<&AppConfig> for RateLimitPolicy {
    fn from(config: &AppConfig) -> Self {
        RateLimitPolicy {
            max_requests: config.rate_limit_max_requests,
            window: config.rate_limit_window(),
        }
    }
}

/// Runs a contact submission through validation, admission, persistence and
/// notification, in that order.
pub struct ContactMeHandler<R, N>
where
    R: SubmissionRepository,
    N: ContactNotifier,
{
    pub submission_repo: R,
    pub notifier: N,
    pub rate_limiter: SlidingWindowLimiter,
    pub policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    notify_timeout: Duration,
}

impl<R, N> ContactMeHandler<R, N>
where
    R: SubmissionRepository,
    N: ContactNotifier,
{
    pub fn new(
        submission_repo: R,
        notifier: N,
        policy: RateLimitPolicy,
        clock: Arc<dyn Clock>,
        notify_timeout: Duration,
    ) -> Self {
        ContactMeHandler {
            submission_repo,
            notifier,
            rate_limiter: SlidingWindowLimiter::new(clock.clone()),
            policy,
            clock,
            notify_timeout,
        }
    }

    /// Handles a new contact form submission.
    ///
    /// Invalid forms never touch the limiter, and rejected requests never
    /// reach the store. A store failure does not give the quota slot back.
    pub async fn submit_contact_message(
        &self,
        form: ContactMeForm,
        client: ClientInfo,
    ) -> Result<ContactMeResponse, AppError> {
        form.validate()?;

        let allowed = self.rate_limiter.is_allowed(
            &client.identifier,
            self.policy.max_requests,
            self.policy.window,
        );
        if !allowed {
            let reset_time = self.rate_limiter.reset_time(&client.identifier, self.policy.window);
            let now = self.clock.now();
            let retry_after_secs = reset_time.map(|at| (at - now).num_seconds());
            return Err(AppError::RateLimited { reset_time, retry_after_secs });
        }

        let submission = Submission::new(form, &client, self.clock.now());

        self.submission_repo
            .insert_submission(&submission)
            .await
            .inspect_err(|e| tracing::error!(id = %submission.id, "Failed to store contact submission: {}", e))?;

        tracing::info!(
            id = %submission.id,
            client = %client.identifier,
            "Contact form submitted by {} ({})",
            submission.name,
            submission.email
        );

        match self.dispatch_notification(&submission).await {
            Ok(status) => tracing::debug!(id = %submission.id, "{}", status),
            Err(e) => tracing::error!(id = %submission.id, "Notification failed: {}", e),
        }

        Ok(ContactMeResponse::accepted())
    }

    async fn dispatch_notification(&self, submission: &Submission) -> Result<String, NotifyError> {
        let notification = ContactNotification::from(submission);

        tokio::time::timeout(self.notify_timeout, self.notifier.notify(&notification))
            .await
            .map_err(|_| NotifyError::Timeout(self.notify_timeout.as_secs()))?
    }

    /// Quota left for a client under the configured policy
    pub fn remaining_quota(&self, identifier: &str) -> usize {
        self.rate_limiter.remaining(identifier, self.policy.max_requests)
    }

    /// Submission totals, with "today" starting at UTC midnight
    pub async fn contact_stats(&self) -> Result<ContactStats, AppError> {
        let midnight = self.clock.now().date_naive().and_time(NaiveTime::MIN).and_utc();

        let total_submissions = self.submission_repo.count_submissions(SubmissionFilter::All).await?;
        let today_submissions = self
            .submission_repo
            .count_submissions(SubmissionFilter::Since(midnight))
            .await?;

        Ok(ContactStats {
            total_submissions,
            today_submissions,
        })
    }
}
