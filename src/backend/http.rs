//! Live backend: every operation is a request through `ApiClient`.

use std::sync::Arc;

use super::KnowledgeBackend;
use crate::api::client::{ApiClient, ApiError};
use crate::api::documents::UploadFile;
use crate::api::types::{
    ContentGeneration, DocumentRecord, FaqContent, KnowledgeGap, SocialContent,
};
use crate::api::{auth, content, documents, gaps};

pub struct HttpBackend {
    api: Arc<ApiClient>,
}

impl HttpBackend {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

impl KnowledgeBackend for HttpBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let resp = auth::login(&self.api, email, password).await?;
        if !resp.token_type.eq_ignore_ascii_case("bearer") {
            log::warn!("Unexpected token type from login: {}", resp.token_type);
        }
        if let Some(user) = &resp.user {
            log::info!("Signed in as {} <{}>", user.full_name, user.email);
        }
        Ok(resp.access_token)
    }

    async fn generate_profile(&self, stone_name: &str) -> Result<ContentGeneration, ApiError> {
        content::generate_profile(&self.api, stone_name).await
    }

    async fn generate_social(&self, stone_id: &str) -> Result<SocialContent, ApiError> {
        content::generate_social(&self.api, stone_id).await
    }

    async fn generate_faq(&self, stone_id: &str) -> Result<FaqContent, ApiError> {
        content::generate_faq(&self.api, stone_id).await
    }

    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, ApiError> {
        documents::list_documents(&self.api).await
    }

    async fn upload_documents(&self, files: &[UploadFile]) -> Result<Vec<DocumentRecord>, ApiError> {
        documents::upload_documents(&self.api, files).await
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError> {
        documents::delete_document(&self.api, document_id).await
    }

    async fn list_knowledge_gaps(&self) -> Result<Vec<KnowledgeGap>, ApiError> {
        gaps::list_knowledge_gaps(&self.api).await
    }
}
