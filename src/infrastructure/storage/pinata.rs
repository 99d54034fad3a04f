use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use url::Url;

use crate::{entities::upload::UploadKind, repositories::blob_store::BlobStore};

const PIN_FILE_URL: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
const UNPIN_URL: &str = "https://api.pinata.cloud/pinning/unpin";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinResponse {
    ipfs_hash: String,
}

/// IPFS-backed file storage through Pinata.
#[derive(Clone)]
pub struct PinataBlobStore {
    client: Client,
    api_jwt: String,
    gateway: Url,
}

impl PinataBlobStore {
    pub fn new(api_jwt: String, gateway_url: &str) -> anyhow::Result<Self> {
        let gateway = Url::parse(gateway_url)
            .with_context(|| format!("Invalid blob gateway URL: {gateway_url}"))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build Pinata HTTP client")?;

        Ok(PinataBlobStore { client, api_jwt, gateway })
    }

    fn public_url(&self, cid: &str) -> anyhow::Result<String> {
        let url = self
            .gateway
            .join(&format!("/ipfs/{cid}"))
            .context("Failed to build gateway URL")?;
        Ok(url.to_string())
    }
}

/// Extracts the content id from a gateway URL of the form `.../ipfs/<cid>`.
pub(crate) fn cid_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    segments.find(|s| *s == "ipfs")?;
    segments.next().filter(|cid| !cid.is_empty()).map(str::to_string)
}

#[async_trait]
impl BlobStore for PinataBlobStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: String,
        mime_type: String,
        kind: UploadKind,
    ) -> anyhow::Result<String> {
        let size = bytes.len();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(&mime_type)
            .context("Invalid MIME type for upload")?;

        let metadata = serde_json::json!({
            "name": file_name,
            "keyvalues": { "kind": kind.as_str() }
        });
        let form = multipart::Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata.to_string());

        let response = self
            .client
            .post(PIN_FILE_URL)
            .bearer_auth(&self.api_jwt)
            .multipart(form)
            .send()
            .await
            .context("Pinata upload request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Pinata upload failed (status={status}): {detail}");
        }

        let pinned: PinResponse = response
            .json()
            .await
            .context("Unexpected Pinata upload response")?;

        tracing::info!(cid = %pinned.ipfs_hash, %kind, size, "File pinned");
        self.public_url(&pinned.ipfs_hash)
    }

    async fn delete(&self, url: &str) -> anyhow::Result<()> {
        let cid = cid_from_url(url).ok_or_else(|| anyhow!("Not a gateway URL: {url}"))?;

        let response = self
            .client
            .delete(format!("{UNPIN_URL}/{cid}"))
            .bearer_auth(&self.api_jwt)
            .send()
            .await
            .context("Pinata unpin request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Pinata unpin failed (status={status}): {detail}");
        }

        tracing::info!(%cid, "File unpinned");
        Ok(())
    }
}
