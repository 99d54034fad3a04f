use async_trait::async_trait;

use crate::entities::upload::UploadKind;

/// Opaque file storage for logos, licenses and resumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the file and returns a URL it can be fetched from.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: String,
        mime_type: String,
        kind: UploadKind,
    ) -> anyhow::Result<String>;

    /// Removes a previously uploaded file by its URL.
    async fn delete(&self, url: &str) -> anyhow::Result<()>;
}
