//! Shared value types for resource services.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Identifier of a backend resource.
///
/// Never empty: construction is the only place a missing identifier can be
/// detected, and it is reported there as [`ClientError::MissingIdentifier`]
/// instead of becoming a request to `/users/`. Services interpolate it through
/// [`ResourceId::path_segment`], so it always stays one segment of the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(resource: &'static str, raw: impl Into<String>) -> ClientResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ClientError::MissingIdentifier { resource });
        }
        // Dot segments survive percent-encoding and are resolved by URL parsing.
        if trimmed == "." || trimmed == ".." {
            return Err(ClientError::InvalidIdentifier {
                resource,
                value: trimmed.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build an identifier from an optional value, failing when absent.
    pub fn require(resource: &'static str, raw: Option<&str>) -> ClientResult<Self> {
        match raw {
            Some(raw) => Self::new(resource, raw),
            None => Err(ClientError::MissingIdentifier { resource }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for interpolation into a URL path.
    pub fn path_segment(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file to be sent as a multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Multipart {
                message: format!("failed to read {}: {}", path.display(), e),
            })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        Ok(Self::new(file_name, mime.essence_str(), bytes))
    }
}

/// Paging parameters shared by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}
