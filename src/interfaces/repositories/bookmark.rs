use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::postgres::with_transaction,
    entities::job::Job,
    errors::AppError,
    repositories::{job::JOB_SELECT, sqlx_repo::SqlxRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Removes the bookmark when present, creates it otherwise.
    /// Returns whether the job is bookmarked afterwards.
    async fn toggle_bookmark(&self, user_id: &Uuid, job_id: &Uuid) -> Result<bool, AppError>;
    /// Approved jobs the user has bookmarked, newest bookmark first.
    async fn list_bookmarked_jobs(&self, user_id: &Uuid) -> Result<Vec<Job>, AppError>;
}

#[async_trait]
impl BookmarkRepository for SqlxRepo {
    async fn toggle_bookmark(&self, user_id: &Uuid, job_id: &Uuid) -> Result<bool, AppError> {
        let (user_id, job_id) = (*user_id, *job_id);

        with_transaction(&self.pool, move |conn| Box::pin(async move {
            let removed = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND job_id = $2")
                .bind(user_id)
                .bind(job_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

            if removed > 0 {
                return Ok(false);
            }

            // A concurrent toggle may have inserted first; the pair stays unique.
            sqlx::query(
                r#"
                INSERT INTO bookmarks (user_id, job_id)
                VALUES ($1, $2)
                ON CONFLICT ON CONSTRAINT bookmarks_user_job_key DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(job_id)
            .execute(&mut *conn)
            .await?;

            Ok(true)
        }))
        .await
    }

    async fn list_bookmarked_jobs(&self, user_id: &Uuid) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"{JOB_SELECT}
            JOIN bookmarks b ON b.job_id = j.id
            WHERE b.user_id = $1 AND j.status = 'APPROVED'
            ORDER BY b.created_at DESC"#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }
}
