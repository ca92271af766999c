//! RAG document management screen.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::api::documents::UploadFile;
use crate::api::types::{DocumentRecord, DocumentStatus};
use crate::backend::KnowledgeBackend;

pub const MSG_LOAD_FAILED: &str = "Failed to load documents";
pub const MSG_NOTHING_SELECTED: &str = "Please select files to upload";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed. Please try again.";
pub const MSG_DELETE_FAILED: &str = "Failed to delete document";

#[derive(Debug, Default)]
pub struct DocumentsView {
    pub documents: Vec<DocumentRecord>,
    pub selected: Vec<UploadFile>,
    pub error: Option<String>,
}

impl DocumentsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<B: KnowledgeBackend>(&mut self, backend: &B) {
        match backend.list_documents().await {
            Ok(documents) => self.documents = documents,
            Err(e) => {
                log::warn!("Document listing failed: {}", e);
                self.error = Some(MSG_LOAD_FAILED.to_string());
            }
        }
    }

    /// Replace the current selection. Clears any previous error.
    pub fn select(&mut self, files: Vec<UploadFile>) {
        self.selected = files;
        self.error = None;
    }

    /// Upload the selection. New records go to the top of the list and the
    /// selection is cleared; on failure the selection is kept for a retry.
    pub async fn upload<B: KnowledgeBackend>(&mut self, backend: &B) {
        if self.selected.is_empty() {
            self.error = Some(MSG_NOTHING_SELECTED.to_string());
            return;
        }
        self.error = None;

        match backend.upload_documents(&self.selected).await {
            Ok(created) => {
                self.documents.splice(0..0, created);
                self.selected.clear();
            }
            Err(e) => {
                log::warn!("Document upload failed: {}", e);
                self.error = Some(MSG_UPLOAD_FAILED.to_string());
            }
        }
    }

    pub async fn delete<B: KnowledgeBackend>(&mut self, backend: &B, document_id: &str) {
        match backend.delete_document(document_id).await {
            Ok(()) => self.documents.retain(|d| d.document_id != document_id),
            Err(e) => {
                log::warn!("Deleting {} failed: {}", document_id, e);
                self.error = Some(MSG_DELETE_FAILED.to_string());
            }
        }
    }

    pub fn status_counts(&self) -> BTreeMap<DocumentStatus, usize> {
        let mut counts = BTreeMap::new();
        for doc in &self.documents {
            *counts.entry(doc.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let counts = self.status_counts();
        let _ = writeln!(
            out,
            "Documents ({})   indexed: {}   processing: {}   failed: {}",
            self.documents.len(),
            counts.get(&DocumentStatus::Indexed).copied().unwrap_or(0),
            counts.get(&DocumentStatus::Processing).copied().unwrap_or(0),
            counts.get(&DocumentStatus::Failed).copied().unwrap_or(0),
        );

        if self.documents.is_empty() {
            let _ = writeln!(out, "No documents uploaded yet.");
        }
        for doc in &self.documents {
            let _ = writeln!(
                out,
                "{:<24} {:<40} {:<10} {:>6.1} MB  {:<5} {}",
                doc.document_id,
                doc.file_name,
                doc.status.label(),
                doc.size_mb,
                doc.file_type.to_uppercase(),
                super::format_timestamp(&doc.uploaded_at)
            );
        }

        if let Some(error) = &self.error {
            let _ = writeln!(out, "\nError: {}", error);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Latency, MockBackend};
    use crate::testing::FailingBackend;
    use std::path::PathBuf;

    fn mock() -> MockBackend {
        MockBackend::new(Latency::none())
    }

    fn upload(name: &str) -> UploadFile {
        UploadFile {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            size_bytes: 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn test_load_and_count() {
        let mut view = DocumentsView::new();
        view.load(&mock()).await;

        assert_eq!(view.documents.len(), 4);
        let counts = view.status_counts();
        assert_eq!(counts[&DocumentStatus::Indexed], 2);
        assert_eq!(counts[&DocumentStatus::Processing], 1);
        assert_eq!(counts[&DocumentStatus::Failed], 1);
        assert!(view.render().starts_with("Documents (4)   indexed: 2   processing: 1   failed: 1"));
    }

    #[tokio::test]
    async fn test_upload_without_selection() {
        let mut view = DocumentsView::new();
        view.upload(&mock()).await;
        assert_eq!(view.error.as_deref(), Some(MSG_NOTHING_SELECTED));
    }

    #[tokio::test]
    async fn test_upload_prepends_and_clears_selection() {
        let backend = mock();
        let mut view = DocumentsView::new();
        view.load(&backend).await;

        view.select(vec![upload("taaffeite.pdf")]);
        view.upload(&backend).await;

        assert!(view.error.is_none());
        assert!(view.selected.is_empty());
        assert_eq!(view.documents.len(), 5);
        assert_eq!(view.documents[0].file_name, "taaffeite.pdf");
        assert_eq!(view.documents[0].status, DocumentStatus::Processing);
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_selection() {
        let mut view = DocumentsView::new();
        view.select(vec![upload("painite.docx")]);

        view.upload(&FailingBackend { unauthorized: false }).await;

        assert_eq!(view.error.as_deref(), Some(MSG_UPLOAD_FAILED));
        assert_eq!(view.selected.len(), 1);
        assert!(view.documents.is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let backend = mock();
        let mut view = DocumentsView::new();
        view.load(&backend).await;

        view.delete(&backend, "doc-004").await;
        assert_eq!(view.documents.len(), 3);
        assert!(view.documents.iter().all(|d| d.document_id != "doc-004"));

        view.delete(&FailingBackend { unauthorized: true }, "doc-001").await;
        assert_eq!(view.error.as_deref(), Some(MSG_DELETE_FAILED));
        assert_eq!(view.documents.len(), 3);
    }

    #[tokio::test]
    async fn test_load_failure_is_inline() {
        let mut view = DocumentsView::new();
        view.load(&FailingBackend { unauthorized: false }).await;
        assert_eq!(view.error.as_deref(), Some(MSG_LOAD_FAILED));
        assert!(view.render().contains("No documents uploaded yet."));
    }
}
