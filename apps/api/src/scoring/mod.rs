//! Dashboard scoring: seven independent heuristic checks folded into one
//! weighted 0–100 score with a grade and a suggestion list.
//!
//! Stateless: every call builds a fresh `DashboardScore` from the text, the
//! extraction metadata and the structured record.

pub mod checks;
pub mod signals;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::DocumentMeta;
use crate::parsing::StructuredRecord;
use crate::scoring::checks::run_all;
use crate::scoring::signals::compute_signals;

pub use signals::Signals;

const MAX_SUGGESTIONS: usize = 12;

// ────────────────────────────────────────────────────────────────────────────
// Output records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKey {
    AtsParse,
    Contact,
    Sections,
    Impact,
    Repetition,
    Brevity,
    Grammar,
}

impl CheckKey {
    pub fn label(self) -> &'static str {
        match self {
            CheckKey::AtsParse => "ATS Parse Rate",
            CheckKey::Contact => "Contact Details",
            CheckKey::Sections => "Sections",
            CheckKey::Impact => "Quantifying Impact",
            CheckKey::Repetition => "Repetition",
            CheckKey::Brevity => "Format & Brevity",
            CheckKey::Grammar => "Spelling & Grammar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckItem {
    pub key: CheckKey,
    pub label: String,
    pub score: u8, // 0 – 100
    pub status: CheckStatus,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "Needs work")]
    NeedsWork,
    Fair,
    Good,
    Great,
    Excellent,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 90 => Grade::Excellent,
            s if s >= 80 => Grade::Great,
            s if s >= 70 => Grade::Good,
            s if s >= 60 => Grade::Fair,
            _ => Grade::NeedsWork,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::NeedsWork => "Needs work",
            Grade::Fair => "Fair",
            Grade::Good => "Good",
            Grade::Great => "Great",
            Grade::Excellent => "Excellent",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardScore {
    pub score: u8,
    pub issues: u32,
    pub ats_parse_rate: u8,
    pub checks: Vec<CheckItem>,
    pub ats_friendly: bool,
    pub grade: Grade,
    pub suggestions: Vec<String>,
    pub signals: Signals,
}

// ────────────────────────────────────────────────────────────────────────────
// Tunables
// ────────────────────────────────────────────────────────────────────────────

/// Heuristic cut-offs. Tuned empirically; none has a deeper derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringThresholds {
    pub scanned_min_chars: usize,
    pub scanned_min_chars_per_page: f64,
    /// Four-space runs above this suggest a multi-column layout.
    pub column_runs: usize,
    pub min_metric_mentions: usize,
    pub repetition_min_word_chars: usize,
    pub repetition_max_count: usize,
    pub short_word_count: usize,
    pub long_word_count: usize,
    pub caps_words: usize,
    /// Non-standard symbols above this count as formatting noise.
    pub symbol_noise: usize,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            scanned_min_chars: 800,
            scanned_min_chars_per_page: 250.0,
            column_runs: 160,
            min_metric_mentions: 6,
            repetition_min_word_chars: 4,
            repetition_max_count: 18,
            short_word_count: 220,
            long_word_count: 1200,
            caps_words: 25,
            symbol_noise: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub ats_parse: f64,
    pub contact: f64,
    pub sections: f64,
    pub impact: f64,
    pub repetition: f64,
    pub brevity: f64,
    pub grammar: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            ats_parse: 0.30,
            contact: 0.15,
            sections: 0.15,
            impact: 0.12,
            repetition: 0.10,
            brevity: 0.10,
            grammar: 0.08,
        }
    }
}

impl ScoreWeights {
    pub fn weight(&self, key: CheckKey) -> f64 {
        match key {
            CheckKey::AtsParse => self.ats_parse,
            CheckKey::Contact => self.contact,
            CheckKey::Sections => self.sections,
            CheckKey::Impact => self.impact,
            CheckKey::Repetition => self.repetition,
            CheckKey::Brevity => self.brevity,
            CheckKey::Grammar => self.grammar,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregation
// ────────────────────────────────────────────────────────────────────────────

/// Σ weight × sub-score, rounded half-to-even and clamped to 0–100.
pub fn weighted_score(checks: &[CheckItem], weights: &ScoreWeights) -> u8 {
    let total: f64 = checks
        .iter()
        .map(|c| weights.weight(c.key) * f64::from(c.score))
        .sum();
    total.clamp(0.0, 100.0).round_ties_even() as u8
}

/// Keeps the first spelling of each suggestion (case-insensitive), at most 12.
pub fn dedupe_suggestions<I: IntoIterator<Item = String>>(suggestions: I) -> Vec<String> {
    let mut seen = HashSet::new();
    suggestions
        .into_iter()
        .filter(|s| seen.insert(s.to_lowercase()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

pub fn compute_dashboard(
    text: &str,
    meta: &DocumentMeta,
    structured: &StructuredRecord,
    thresholds: &ScoringThresholds,
) -> DashboardScore {
    if text.trim().is_empty() {
        return degraded_dashboard(meta);
    }

    let signals = compute_signals(text, meta, thresholds);
    let outcomes = run_all(text, &signals, structured, thresholds);

    let issues = outcomes.iter().filter(|o| o.penalized).count() as u32;
    let ats_parse_rate = outcomes
        .iter()
        .find(|o| o.item.key == CheckKey::AtsParse)
        .map(|o| o.item.score)
        .unwrap_or(0);

    let (checks, suggestion_lists): (Vec<_>, Vec<_>) =
        outcomes.into_iter().map(|o| (o.item, o.suggestions)).unzip();
    let suggestions = dedupe_suggestions(suggestion_lists.into_iter().flatten());

    let score = weighted_score(&checks, &ScoreWeights::default());
    let grade = Grade::from_score(score);
    debug!("Dashboard: score={score} grade={grade} issues={issues}");

    DashboardScore {
        score,
        issues,
        ats_parse_rate,
        checks,
        ats_friendly: ats_parse_rate >= 70 && score >= 60,
        grade,
        suggestions,
        signals,
    }
}

/// Fixed result for documents with no extractable text.
fn degraded_dashboard(meta: &DocumentMeta) -> DashboardScore {
    DashboardScore {
        score: 20,
        issues: 1,
        ats_parse_rate: 10,
        checks: Vec::new(),
        ats_friendly: false,
        grade: Grade::NeedsWork,
        suggestions: vec![
            "No text could be extracted. If this is a scanned PDF, run OCR or export as a text-based PDF."
                .to_string(),
        ],
        signals: Signals::extraction_failed(meta),
    }
}
