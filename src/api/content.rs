//! Content generation endpoints: stone profiles, social posts, FAQs.

use super::client::{ApiClient, ApiError};
use super::envelope_data;
use super::types::{
    ContentGeneration, FaqContent, GenerateProfileRequest, SocialContent, StandardResponse,
};

/// Generate the wiki profile for a stone.
///
/// POST /content/generate with `{stone_name}`.
pub async fn generate_profile(
    client: &ApiClient,
    stone_name: &str,
) -> Result<ContentGeneration, ApiError> {
    let request = GenerateProfileRequest {
        stone_name: stone_name.to_string(),
    };
    let envelope: StandardResponse<ContentGeneration> =
        client.post_json("/content/generate", &request).await?;
    envelope_data(envelope)
}

/// Generate the tweet thread and Instagram caption for a generated stone.
///
/// POST /content/{stone_id}/social
pub async fn generate_social(client: &ApiClient, stone_id: &str) -> Result<SocialContent, ApiError> {
    let path = format!("/content/{}/social", urlencoding::encode(stone_id));
    let envelope: StandardResponse<SocialContent> =
        client.post_json(&path, &serde_json::json!({})).await?;
    envelope_data(envelope)
}

/// Generate FAQs for a generated stone.
///
/// POST /content/{stone_id}/faq
pub async fn generate_faq(client: &ApiClient, stone_id: &str) -> Result<FaqContent, ApiError> {
    let path = format!("/content/{}/faq", urlencoding::encode(stone_id));
    let envelope: StandardResponse<FaqContent> =
        client.post_json(&path, &serde_json::json!({})).await?;
    envelope_data(envelope)
}
