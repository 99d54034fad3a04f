use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;

use crate::{entities::upload::UploadKind, repositories::blob_store::BlobStore, settings::AppConfig};

pub mod pinata;

/// Stand-in used when no storage credentials are configured; every call fails.
#[derive(Debug, Clone, Default)]
pub struct DisabledBlobStore;

#[async_trait]
impl BlobStore for DisabledBlobStore {
    async fn upload(&self, _: Vec<u8>, _: String, _: String, _: UploadKind) -> anyhow::Result<String> {
        bail!("File storage is not configured")
    }

    async fn delete(&self, _: &str) -> anyhow::Result<()> {
        bail!("File storage is not configured")
    }
}

pub fn build_blob_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    match &config.blob_api_jwt {
        Some(jwt) => Ok(Arc::new(pinata::PinataBlobStore::new(jwt.clone(), &config.blob_gateway_url)?)),
        None => {
            tracing::warn!("BLOB_API_JWT not set; uploads are disabled");
            Ok(Arc::new(DisabledBlobStore))
        }
    }
}
