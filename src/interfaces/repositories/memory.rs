use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    entities::contact_me::{Submission, SubmissionFilter},
    errors::AppError,
    repositories::contact_me::SubmissionRepository,
};

/// Process-local store used when no database is configured and in tests.
#[derive(Clone, Default)]
pub struct InMemorySubmissionRepo {
    submissions: Arc<RwLock<Vec<Submission>>>,
}

impl InMemorySubmissionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Submission> {
        self.submissions.read().clone()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_submission(&self, submission: &Submission) -> Result<(), AppError> {
        self.submissions.write().push(submission.clone());
        Ok(())
    }

    async fn count_submissions(&self, filter: SubmissionFilter) -> Result<i64, AppError> {
        let submissions = self.submissions.read();
        let count = match filter {
            SubmissionFilter::All => submissions.len(),
            SubmissionFilter::Since(since) => submissions
                .iter()
                .filter(|s| s.created_at >= since)
                .count(),
        };

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::contact_me::{ClientInfo, ContactMeForm};
    use chrono::{TimeDelta, Utc};

    fn submission_at(created_at: chrono::DateTime<Utc>) -> Submission {
        let form = ContactMeForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hello from the tests".into(),
        };
        let client = ClientInfo {
            identifier: "127.0.0.1".into(),
            user_agent: None,
        };
        Submission::new(form, &client, created_at)
    }

    #[tokio::test]
    async fn counts_respect_since_filter() {
        let repo = InMemorySubmissionRepo::new();
        let now = Utc::now();
        repo.insert_submission(&submission_at(now - TimeDelta::days(2))).await.unwrap();
        repo.insert_submission(&submission_at(now)).await.unwrap();

        assert_eq!(repo.count_submissions(SubmissionFilter::All).await.unwrap(), 2);
        assert_eq!(
            repo.count_submissions(SubmissionFilter::Since(now - TimeDelta::hours(1))).await.unwrap(),
            1
        );
    }
}
