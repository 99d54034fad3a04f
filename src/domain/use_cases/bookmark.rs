use std::sync::Arc;

use tracing::instrument;

use crate::{
    entities::{
        actor::Actor,
        bookmark::{BookmarkToggleRequest, BookmarkToggleResponse},
        job::Job,
    },
    errors::AppError,
    repositories::{bookmark::BookmarkRepository, job::JobRepository},
};

pub struct BookmarkHandler {
    pub bookmark_repo: Arc<dyn BookmarkRepository>,
    pub job_repo: Arc<dyn JobRepository>,
}

impl BookmarkHandler {
    pub fn new(bookmark_repo: Arc<dyn BookmarkRepository>, job_repo: Arc<dyn JobRepository>) -> Self {
        BookmarkHandler { bookmark_repo, job_repo }
    }

    /// Bookmarks the job when it is not bookmarked yet, removes the bookmark otherwise.
    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn toggle_bookmark(
        &self,
        actor: &Actor,
        request: BookmarkToggleRequest,
    ) -> Result<BookmarkToggleResponse, AppError> {
        let job_id = request
            .job_id
            .ok_or_else(|| AppError::invalid_field("job_id", "Job id is required"))?;

        if self.job_repo.get_job(&job_id).await?.is_none() {
            return Err(AppError::invalid_field("job_id", "Job does not exist"));
        }

        let bookmarked = self.bookmark_repo.toggle_bookmark(&actor.user_id, &job_id).await?;
        tracing::info!(%job_id, bookmarked, "Bookmark toggled");

        Ok(BookmarkToggleResponse { bookmarked })
    }

    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn list_bookmarks(&self, actor: &Actor) -> Result<Vec<Job>, AppError> {
        self.bookmark_repo.list_bookmarked_jobs(&actor.user_id).await
    }
}
