//! Console views: local state for each screen plus plain-text rendering.
//!
//! Views never propagate errors. A failed call leaves a one-line message in
//! the view's `error` field and the rest of the state untouched.

pub mod content;
pub mod documents;
pub mod gaps;

use chrono::{DateTime, Utc};

pub use content::ContentView;
pub use documents::DocumentsView;
pub use gaps::{GapsView, SourceFilter};

/// `Jul 8, 2025 09:30` style timestamp.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y %H:%M").to_string()
}
