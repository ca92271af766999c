//! Data sources behind the console views.
//!
//! `MockBackend` serves built-in fixtures after a fixed artificial delay.
//! `HttpBackend` talks to the live API through the session-scoped client.

pub mod http;
pub mod mock;

pub use http::HttpBackend;
pub use mock::{Latency, MockBackend};

use crate::api::client::ApiError;
use crate::api::documents::UploadFile;
use crate::api::types::{
    ContentGeneration, DocumentRecord, FaqContent, KnowledgeGap, SocialContent,
};

/// Operations the console views need from the knowledge platform.
///
/// Implemented by the live HTTP backend and the fixture-backed mock; tests
/// add their own failing implementations.
#[allow(async_fn_in_trait)]
pub trait KnowledgeBackend {
    /// Exchange operator credentials for a bearer token.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, ApiError>;

    async fn generate_profile(&self, stone_name: &str) -> Result<ContentGeneration, ApiError>;

    async fn generate_social(&self, stone_id: &str) -> Result<SocialContent, ApiError>;

    async fn generate_faq(&self, stone_id: &str) -> Result<FaqContent, ApiError>;

    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, ApiError>;

    /// Returns the newly created records, in upload order.
    async fn upload_documents(&self, files: &[UploadFile]) -> Result<Vec<DocumentRecord>, ApiError>;

    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError>;

    async fn list_knowledge_gaps(&self) -> Result<Vec<KnowledgeGap>, ApiError>;
}
