//! Knowledge gap endpoints.

use super::client::{ApiClient, ApiError};
use super::envelope_data;
use super::types::{KnowledgeGap, StandardResponse};

/// GET /knowledge-gaps
pub async fn list_knowledge_gaps(client: &ApiClient) -> Result<Vec<KnowledgeGap>, ApiError> {
    let envelope: StandardResponse<Vec<KnowledgeGap>> = client.get_json("/knowledge-gaps").await?;
    envelope_data(envelope)
}
