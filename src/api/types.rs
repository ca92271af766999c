//! Request and response types for the STOMATON backend API.
//!
//! Field names follow the API's snake_case JSON, so no renaming is needed
//! except where a field collides with a Rust keyword.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard response envelope used by every live endpoint.
#[derive(Debug, Deserialize)]
pub struct StandardResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Login request body sent to POST /auth/login.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response from POST /auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body for POST /content/generate.
#[derive(Debug, Serialize)]
pub struct GenerateProfileRequest {
    pub stone_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchData {
    pub mineralogy: String,
    pub formation: String,
    pub locations: Vec<String>,
}

/// Generated wiki profile for one stone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoneProfile {
    pub name: String,
    pub research_data: ResearchData,
    /// Markdown article body.
    pub wiki_content: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
    #[serde(default)]
    pub cross_links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationCost {
    pub total: f64,
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
}

/// Result of a profile generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentGeneration {
    pub status: String,
    pub content: StoneProfile,
    pub stone_id: String,
    pub cost: GenerationCost,
    /// Seconds.
    pub processing_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPosts {
    pub tweet_thread: Vec<String>,
    pub instagram_caption: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialContent {
    pub status: String,
    pub stone_id: String,
    pub content: SocialPosts,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqList {
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqContent {
    pub status: String,
    pub stone_id: String,
    pub content: FaqList,
    pub generated_at: DateTime<Utc>,
}

/// Processing status of a knowledge-base document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Indexed,
    Failed,
}

impl DocumentStatus {
    pub fn label(&self) -> &str {
        match self {
            DocumentStatus::Processing => "Processing",
            DocumentStatus::Indexed => "Indexed",
            DocumentStatus::Failed => "Failed",
        }
    }
}

/// A document in the retrieval knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document_id: String,
    pub file_name: String,
    pub status: DocumentStatus,
    pub uploaded_at: DateTime<Utc>,
    pub size_mb: f64,
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GapType {
    MissingContent,
    IncompleteData,
    OutdatedInfo,
    #[serde(other)]
    Other,
}

impl GapType {
    pub fn label(&self) -> &str {
        match self {
            GapType::MissingContent => "Missing Content",
            GapType::IncompleteData => "Incomplete Data",
            GapType::OutdatedInfo => "Outdated Info",
            GapType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Channel a knowledge gap was detected on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GapSource {
    FailedSearch,
    Whatsapp,
    Telegram,
    #[serde(other)]
    Other,
}

impl GapSource {
    pub fn as_str(&self) -> &str {
        match self {
            GapSource::FailedSearch => "failed_search",
            GapSource::Whatsapp => "whatsapp",
            GapSource::Telegram => "telegram",
            GapSource::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "failed_search" => Some(GapSource::FailedSearch),
            "whatsapp" => Some(GapSource::Whatsapp),
            "telegram" => Some(GapSource::Telegram),
            _ => None,
        }
    }
}

impl fmt::Display for GapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A detected hole in the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeGap {
    pub id: String,
    pub stone_name: String,
    pub gap_type: GapType,
    pub priority: Priority,
    pub source: GapSource,
    pub identified_at: DateTime<Utc>,
    pub frequency: u32,
    #[serde(default)]
    pub description: String,
}
