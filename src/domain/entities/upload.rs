use std::{fmt, str::FromStr};

use actix_multipart::form::{bytes::Bytes as MpBytes, MultipartForm};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// What an uploaded file will be attached to; decides the accepted formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Logo,
    License,
    Resume,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Logo => "logo",
            UploadKind::License => "license",
            UploadKind::Resume => "resume",
        }
    }

    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Logo => &["image/png", "image/jpeg", "image/webp", "image/gif"],
            UploadKind::License => &["application/pdf", "image/png", "image/jpeg"],
            UploadKind::Resume => &["application/pdf"],
        }
    }

    /// Resumes carry personal data and need a signed-in job seeker.
    pub fn requires_authentication(&self) -> bool {
        matches!(self, UploadKind::Resume)
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logo" => Ok(UploadKind::Logo),
            "license" => Ok(UploadKind::License),
            "resume" => Ok(UploadKind::Resume),
            _ => Err(AppError::invalid_field("kind", "Kind must be one of logo, license, resume")),
        }
    }
}

/// Multipart body of `POST /uploads`. The configured `max_upload_bytes`
/// is enforced again once the bytes are in memory.
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    #[multipart(rename = "file", limit = "25MB")]
    pub file: MpBytes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadQuery {
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub kind: UploadKind,
}
