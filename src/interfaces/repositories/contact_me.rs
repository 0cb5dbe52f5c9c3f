use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::contact_me::{Submission, SubmissionFilter},
    errors::AppError,
    repositories::sqlx_repo::SqlxSubmissionRepo,
};

/// Durable home of accepted submissions.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn insert_submission(&self, submission: &Submission) -> Result<(), AppError>;
    async fn count_submissions(&self, filter: SubmissionFilter) -> Result<i64, AppError>;
}

#[async_trait]
impl<T> SubmissionRepository for Arc<T>
where
    T: SubmissionRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn insert_submission(&self, submission: &Submission) -> Result<(), AppError> {
        (**self).insert_submission(submission).await
    }

    async fn count_submissions(&self, filter: SubmissionFilter) -> Result<i64, AppError> {
        (**self).count_submissions(filter).await
    }
}

impl SqlxSubmissionRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSubmissionRepo { pool }
    }
}

#[async_trait]
impl SubmissionRepository for SqlxSubmissionRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn insert_submission(&self, submission: &Submission) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO contact_submissions (id, name, email, message, created_at, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(submission.id)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.message)
        .bind(submission.created_at)
        .bind(&submission.ip_address)
        .bind(&submission.user_agent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_submissions(&self, filter: SubmissionFilter) -> Result<i64, AppError> {
        let count = match filter {
            SubmissionFilter::All => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_submissions")
                    .fetch_one(&self.pool)
                    .await?
            }
            SubmissionFilter::Since(since) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM contact_submissions WHERE created_at >= $1",
                )
                .bind(since)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(count)
    }
}
