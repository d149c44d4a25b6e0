//! Human-readable renderings of an [`Assessment`](crate::domain::model::Assessment).
//!
//! Both renderers share the verdict mappings and the empty-list placeholder
//! so the Markdown and HTML reports for one candidate always agree.

pub mod html;
pub mod markdown;

use crate::domain::model::Verdict;

pub use html::render_html;
pub use markdown::render_markdown;

/// Shown instead of bullets when no missing requirements were found.
pub const NO_MISSING_REQUIREMENTS: &str = "Nav identificētas būtiskas trūkstošas prasības.";

pub const COLOR_STRONG: &str = "#22c55e";
pub const COLOR_POSSIBLE: &str = "#f59e0b";
pub const COLOR_NOT: &str = "#ef4444";
pub const COLOR_FALLBACK: &str = "#6b7280";

pub fn verdict_emoji(verdict: &Verdict) -> &'static str {
    match verdict {
        Verdict::StrongMatch => "✅",
        Verdict::PossibleMatch => "⚠️",
        Verdict::NotAMatch => "❌",
        Verdict::Other(_) => "❓",
    }
}

pub fn verdict_color(verdict: &Verdict) -> &'static str {
    match verdict {
        Verdict::StrongMatch => COLOR_STRONG,
        Verdict::PossibleMatch => COLOR_POSSIBLE,
        Verdict::NotAMatch => COLOR_NOT,
        Verdict::Other(_) => COLOR_FALLBACK,
    }
}
