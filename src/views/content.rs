//! Content generation screen: stone profile, then optional social posts
//! and FAQs for the generated stone.

use std::fmt::Write;

use crate::api::types::{ContentGeneration, FaqContent, SocialContent};
use crate::backend::KnowledgeBackend;

pub const MSG_STONE_NAME_REQUIRED: &str = "Please enter a stone name";
pub const MSG_PROFILE_REQUIRED: &str = "Generate a stone profile first";
pub const MSG_PROFILE_FAILED: &str = "Failed to generate stone profile. Please try again.";
pub const MSG_SOCIAL_FAILED: &str = "Failed to generate social content.";
pub const MSG_FAQ_FAILED: &str = "Failed to generate FAQs.";

#[derive(Debug, Default)]
pub struct ContentView {
    pub profile: Option<ContentGeneration>,
    pub social: Option<SocialContent>,
    pub faq: Option<FaqContent>,
    pub error: Option<String>,
}

impl ContentView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a profile for `stone_name`. A new profile discards social
    /// posts and FAQs from the previous stone.
    pub async fn generate_profile<B: KnowledgeBackend>(&mut self, backend: &B, stone_name: &str) {
        let stone_name = stone_name.trim();
        if stone_name.is_empty() {
            self.error = Some(MSG_STONE_NAME_REQUIRED.to_string());
            return;
        }
        self.error = None;

        match backend.generate_profile(stone_name).await {
            Ok(generated) => {
                log::info!(
                    "Generated profile for {} ({}) in {:.1}s",
                    generated.content.name,
                    generated.stone_id,
                    generated.processing_time
                );
                self.profile = Some(generated);
                self.social = None;
                self.faq = None;
            }
            Err(e) => {
                log::warn!("Profile generation failed: {}", e);
                self.error = Some(MSG_PROFILE_FAILED.to_string());
            }
        }
    }

    pub async fn generate_social<B: KnowledgeBackend>(&mut self, backend: &B) {
        let Some(stone_id) = self.profile.as_ref().map(|p| p.stone_id.clone()) else {
            self.error = Some(MSG_PROFILE_REQUIRED.to_string());
            return;
        };
        match backend.generate_social(&stone_id).await {
            Ok(social) => self.social = Some(social),
            Err(e) => {
                log::warn!("Social content generation failed: {}", e);
                self.error = Some(MSG_SOCIAL_FAILED.to_string());
            }
        }
    }

    pub async fn generate_faq<B: KnowledgeBackend>(&mut self, backend: &B) {
        let Some(stone_id) = self.profile.as_ref().map(|p| p.stone_id.clone()) else {
            self.error = Some(MSG_PROFILE_REQUIRED.to_string());
            return;
        };
        match backend.generate_faq(&stone_id).await {
            Ok(faq) => self.faq = Some(faq),
            Err(e) => {
                log::warn!("FAQ generation failed: {}", e);
                self.error = Some(MSG_FAQ_FAILED.to_string());
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(generated) = &self.profile {
            let profile = &generated.content;
            let _ = writeln!(out, "== {} ({}) ==", profile.name, generated.stone_id);
            let _ = writeln!(
                out,
                "Cost: ${:.2}   Processing time: {:.1}s   Generated: {}",
                generated.cost.total,
                generated.processing_time,
                super::format_timestamp(&profile.generated_at)
            );
            for (part, cost) in &generated.cost.breakdown {
                let _ = writeln!(out, "  {:<12} ${:.2}", part, cost);
            }
            let _ = writeln!(out, "\nMineralogy: {}", profile.research_data.mineralogy);
            let _ = writeln!(out, "Formation:  {}", profile.research_data.formation);
            let _ = writeln!(out, "Locations:  {}", profile.research_data.locations.join(", "));
            if !profile.categories.is_empty() {
                let categories: Vec<String> = profile
                    .categories
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                let _ = writeln!(out, "Categories: {}", categories.join(", "));
            }
            if !profile.cross_links.is_empty() {
                let _ = writeln!(out, "See also:   {}", profile.cross_links.join(", "));
            }
            let _ = writeln!(out, "\n{}", profile.wiki_content.trim_end());
        }

        if let Some(social) = &self.social {
            let _ = writeln!(out, "\n== Tweet thread ==");
            for tweet in &social.content.tweet_thread {
                let _ = writeln!(out, "- {}", tweet);
            }
            let _ = writeln!(out, "\n== Instagram caption ==\n{}", social.content.instagram_caption);
        }

        if let Some(faq) = &self.faq {
            let _ = writeln!(out, "\n== FAQs ==");
            for entry in &faq.content.faqs {
                let _ = writeln!(out, "[{}] Q: {}\n    A: {}", entry.category, entry.question, entry.answer);
            }
        }

        if let Some(error) = &self.error {
            let _ = writeln!(out, "\nError: {}", error);
        }

        out
    }
}
