use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{actor::Actor, upload::{UploadKind, UploadResponse}, user::Role},
    errors::AppError,
    repositories::blob_store::BlobStore,
};

pub struct UploadHandler {
    pub blob_store: Arc<dyn BlobStore>,
    pub max_upload_bytes: usize,
}

impl UploadHandler {
    pub fn new(blob_store: Arc<dyn BlobStore>, max_upload_bytes: usize) -> Self {
        UploadHandler { blob_store, max_upload_bytes }
    }

    /// Stores a logo, license or resume. The file type is decided from its
    /// content, never from the name or the declared content type.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        actor: Option<&Actor>,
        kind: UploadKind,
        file_name: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, AppError> {
        if kind.requires_authentication() {
            let actor = actor.ok_or(AppError::UnauthorizedAccess)?;
            actor.require_role(Role::JobSeeker)?;
        }

        let mime_type = self.check_file(kind, &bytes)?;
        let file_name = sanitize_file_name(file_name.as_deref(), kind);

        let url = self
            .blob_store
            .upload(bytes, file_name, mime_type.to_string(), kind)
            .await?;

        Ok(UploadResponse { url, kind })
    }

    pub fn check_file(&self, kind: UploadKind, bytes: &[u8]) -> Result<&'static str, AppError> {
        if bytes.is_empty() {
            return Err(AppError::invalid_field("file", "File is empty"));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(AppError::invalid_field(
                "file",
                format!("File exceeds the {} byte limit", self.max_upload_bytes),
            ));
        }

        let mime_type = infer::get(bytes)
            .map(|t| t.mime_type())
            .filter(|mime| kind.allowed_mime_types().contains(mime))
            .ok_or_else(|| {
                AppError::invalid_field(
                    "file",
                    format!("Unsupported file type for {}; allowed: {}", kind, kind.allowed_mime_types().join(", ")),
                )
            })?;

        Ok(mime_type)
    }
}

/// Keeps only the final path component and a safe character set.
fn sanitize_file_name(name: Option<&str>, kind: UploadKind) -> String {
    let cleaned: String = name
        .and_then(|n| n.rsplit(|c: char| c == '/' || c == '\\').next())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(100)
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        format!("{}-{}", kind, Uuid::new_v4())
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::blob_store::MockBlobStore;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R'];
    const PDF_HEADER: &[u8] = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n";

    fn handler(store: MockBlobStore) -> UploadHandler {
        UploadHandler::new(Arc::new(store), 1024)
    }

    #[tokio::test]
    async fn logo_upload_is_public_and_sniffed() {
        let mut store = MockBlobStore::new();
        store.expect_upload()
            .withf(|_, name, mime, kind| name == "logo.png" && mime == "image/png" && *kind == UploadKind::Logo)
            .returning(|_, _, _, _| Ok("https://gateway.pinata.cloud/ipfs/QmLogo".into()));

        let response = handler(store)
            .upload(None, UploadKind::Logo, Some("../../logo.png".into()), PNG_HEADER.to_vec())
            .await
            .unwrap();

        assert_eq!(response.url, "https://gateway.pinata.cloud/ipfs/QmLogo");
    }

    #[tokio::test]
    async fn resume_upload_requires_a_job_seeker() {
        let handler = handler(MockBlobStore::new());

        let anonymous = handler.upload(None, UploadKind::Resume, None, PDF_HEADER.to_vec()).await;
        assert!(matches!(anonymous, Err(AppError::UnauthorizedAccess)));

        let company_admin = Actor::new(Uuid::new_v4(), Role::CompanyAdmin, None);
        let result = handler
            .upload(Some(&company_admin), UploadKind::Resume, None, PDF_HEADER.to_vec())
            .await;
        assert!(matches!(result, Err(AppError::ForbiddenAccess)));
    }

    #[test]
    fn file_checks_reject_wrong_type_and_size() {
        let handler = handler(MockBlobStore::new());

        assert!(handler.check_file(UploadKind::Resume, PNG_HEADER).is_err());
        assert_eq!(handler.check_file(UploadKind::Resume, PDF_HEADER).unwrap(), "application/pdf");
        assert!(handler.check_file(UploadKind::Logo, &[]).is_err());
        assert!(handler.check_file(UploadKind::Logo, &vec![0u8; 2048]).is_err());
        assert!(handler.check_file(UploadKind::Logo, b"plain text").is_err());
    }

    #[test]
    fn file_names_are_reduced_to_safe_basenames() {
        assert_eq!(sanitize_file_name(Some("C:\\docs\\cv final.pdf"), UploadKind::Resume), "cvfinal.pdf");
        assert!(sanitize_file_name(None, UploadKind::License).starts_with("license-"));
        assert!(sanitize_file_name(Some(".."), UploadKind::Logo).starts_with("logo-"));
    }
}
