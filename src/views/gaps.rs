//! Knowledge gap review screen, filterable by originating channel.

use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::str::FromStr;

use crate::api::types::{GapSource, KnowledgeGap, Priority};
use crate::backend::KnowledgeBackend;

pub const MSG_LOAD_FAILED: &str = "Failed to load knowledge gaps";

/// Which channel's gaps to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Only(GapSource),
}

impl SourceFilter {
    pub fn matches(&self, gap: &KnowledgeGap) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(source) => gap.source == *source,
        }
    }
}

impl FromStr for SourceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(SourceFilter::All);
        }
        GapSource::parse(s)
            .map(SourceFilter::Only)
            .ok_or_else(|| format!("unknown source '{}' (expected all, failed_search, whatsapp, telegram)", s))
    }
}

impl fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFilter::All => f.write_str("all"),
            SourceFilter::Only(source) => write!(f, "{}", source),
        }
    }
}

#[derive(Debug, Default)]
pub struct GapsView {
    pub gaps: Vec<KnowledgeGap>,
    pub filter: SourceFilter,
    pub error: Option<String>,
}

impl GapsView {
    pub fn new(filter: SourceFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub async fn load<B: KnowledgeBackend>(&mut self, backend: &B) {
        match backend.list_knowledge_gaps().await {
            Ok(gaps) => self.gaps = gaps,
            Err(e) => {
                log::warn!("Knowledge gap listing failed: {}", e);
                self.error = Some(MSG_LOAD_FAILED.to_string());
            }
        }
    }

    pub fn filtered(&self) -> Vec<&KnowledgeGap> {
        self.gaps.iter().filter(|g| self.filter.matches(g)).collect()
    }

    /// Gap count per source over the unfiltered list.
    pub fn counts_by_source(&self) -> BTreeMap<GapSource, usize> {
        let mut counts = BTreeMap::new();
        for gap in &self.gaps {
            *counts.entry(gap.source).or_insert(0) += 1;
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.gaps.len()
    }

    pub fn high_priority_count(&self) -> usize {
        self.gaps.iter().filter(|g| g.priority == Priority::High).count()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Total gaps: {}   High priority: {}",
            self.total(),
            self.high_priority_count()
        );
        let by_source: Vec<String> = self
            .counts_by_source()
            .iter()
            .map(|(source, n)| format!("{}: {}", source, n))
            .collect();
        if !by_source.is_empty() {
            let _ = writeln!(out, "By source: {}", by_source.join(", "));
        }

        let filtered = self.filtered();
        let _ = writeln!(out, "\nKnowledge Gaps ({}) [source: {}]", filtered.len(), self.filter);
        if filtered.is_empty() {
            let _ = writeln!(out, "No knowledge gaps found for the selected source.");
        }
        for gap in filtered {
            let _ = writeln!(
                out,
                "{:<8} {:<20} {:<16} {:<7} {:<14} x{:<4} {}",
                gap.id,
                gap.stone_name,
                gap.gap_type.label(),
                gap.priority.label(),
                gap.source,
                gap.frequency,
                super::format_timestamp(&gap.identified_at)
            );
            if !gap.description.is_empty() {
                let _ = writeln!(out, "         {}", gap.description);
            }
        }

        if let Some(error) = &self.error {
            let _ = writeln!(out, "\nError: {}", error);
        }
        out
    }
}
