//! RAG knowledge-base document endpoints.

use std::path::PathBuf;

use reqwest::multipart;

use super::client::{decode_json, ApiClient, ApiError};
use super::envelope_data;
use super::types::{DocumentRecord, StandardResponse};

/// A local file picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

impl UploadFile {
    /// Stat `path` and capture its name and size.
    pub async fn from_path(path: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let path = path.into();
        let meta = tokio::fs::metadata(&path).await.map_err(|source| ApiError::Io {
            path: path.clone(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path,
            file_name,
            size_bytes: meta.len(),
        })
    }

    /// Lower-cased extension, or `unknown`.
    pub fn file_type(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
            _ => "unknown".to_string(),
        }
    }

    /// Size in megabytes rounded to one decimal.
    pub fn size_mb(&self) -> f64 {
        let mb = self.size_bytes as f64 / (1024.0 * 1024.0);
        (mb * 10.0).round() / 10.0
    }
}

/// GET /rag/documents
pub async fn list_documents(client: &ApiClient) -> Result<Vec<DocumentRecord>, ApiError> {
    let envelope: StandardResponse<Vec<DocumentRecord>> = client.get_json("/rag/documents").await?;
    envelope_data(envelope)
}

/// Upload files to the knowledge base.
///
/// POST /rag/documents with one multipart `files` part per file. Returns the
/// records the backend created.
pub async fn upload_documents(
    client: &ApiClient,
    files: &[UploadFile],
) -> Result<Vec<DocumentRecord>, ApiError> {
    let mut form = multipart::Form::new();
    for file in files {
        let data = tokio::fs::read(&file.path).await.map_err(|source| ApiError::Io {
            path: file.path.clone(),
            source,
        })?;
        let part = multipart::Part::bytes(data)
            .file_name(file.file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| ApiError::Decode(format!("Failed to create multipart part: {}", e)))?;
        form = form.part("files", part);
    }

    let resp = client.multipart_post("/rag/documents", form).await?;
    let envelope: StandardResponse<Vec<DocumentRecord>> = decode_json(resp).await?;
    envelope_data(envelope)
}

/// DELETE /rag/documents/{id}
pub async fn delete_document(client: &ApiClient, document_id: &str) -> Result<(), ApiError> {
    let path = format!("/rag/documents/{}", urlencoding::encode(document_id));
    client.delete(&path).await?;
    Ok(())
}
