//! The seven dashboard checks. Each is a pure function of text, signals and
//! the structured record, and reports its own suggestions.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::{SectionKey, StructuredRecord};
use crate::scoring::signals::{Signals, WORD};
use crate::scoring::{CheckItem, CheckKey, CheckStatus, ScoringThresholds};

static METRIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+%|\b\d+\b").expect("valid regex"));

static SHOUTING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{4,}\b").expect("valid regex"));

static SYMBOL_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s•\-,.;:/()@+%#&]").expect("valid regex"));

/// One check's result plus whatever it wants to tell the user.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub item: CheckItem,
    pub suggestions: Vec<String>,
    /// True when any penalty condition fired; counts as one issue.
    pub penalized: bool,
}

impl CheckOutcome {
    fn new(key: CheckKey, score: u8, status: CheckStatus, note: impl Into<String>) -> Self {
        Self {
            item: CheckItem {
                key,
                label: key.label().to_string(),
                score,
                status,
                note: note.into(),
            },
            suggestions: Vec::new(),
            penalized: false,
        }
    }

    fn penalize(mut self, suggestion: &str) -> Self {
        self.penalized = true;
        self.suggestions.push(suggestion.to_string());
        self
    }
}

/// pass ≥ 85, warn ≥ 60, fail below. A penalized check never reports pass.
fn deduction_status(score: u8, penalized: bool) -> CheckStatus {
    match score {
        s if s >= 85 && !penalized => CheckStatus::Pass,
        s if s >= 60 => CheckStatus::Warn,
        _ => CheckStatus::Fail,
    }
}

/// Starts at 100 and subtracts each triggered deduction, flooring at 0.
fn deduct(deductions: &[(bool, u8)]) -> u8 {
    let lost: u32 = deductions
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, points)| u32::from(*points))
        .sum();
    100u32.saturating_sub(lost) as u8
}

pub fn run_all(
    text: &str,
    signals: &Signals,
    structured: &StructuredRecord,
    thresholds: &ScoringThresholds,
) -> Vec<CheckOutcome> {
    vec![
        ats_parse(signals),
        contact(structured),
        sections(structured),
        impact(text, thresholds),
        repetition(text, thresholds),
        brevity(signals, thresholds),
        grammar(text, thresholds),
    ]
}

pub fn ats_parse(signals: &Signals) -> CheckOutcome {
    if signals.likely_scanned_pdf {
        CheckOutcome::new(
            CheckKey::AtsParse,
            30,
            CheckStatus::Fail,
            "Looks scanned or image-based.",
        )
        .penalize(
            "Export your resume as a text-based PDF (not scanned). If needed, run OCR before uploading.",
        )
    } else {
        CheckOutcome::new(
            CheckKey::AtsParse,
            92,
            CheckStatus::Pass,
            "Text extraction works.",
        )
    }
}

pub fn contact(structured: &StructuredRecord) -> CheckOutcome {
    let contacts = &structured.contacts;
    let missing_email = contacts.emails.is_empty();
    let missing_phone = contacts.phones.is_empty();
    let missing_link = !contacts.has_profile_link();

    let score = deduct(&[(missing_email, 45), (missing_phone, 25), (missing_link, 10)]);
    let penalized = missing_email || missing_phone || missing_link;

    let mut notes = Vec::new();
    let mut suggestions = Vec::new();
    if missing_email {
        notes.push("No email found");
        suggestions.push("Add a professional email near the top in plain text.");
    }
    if missing_phone {
        notes.push("No phone found");
        suggestions.push("Add a phone number in plain text (include country code).");
    }
    if missing_link {
        notes.push("No profile links found");
        suggestions.push("Add LinkedIn/GitHub/portfolio link in plain text.");
    }

    let note = if notes.is_empty() {
        "Looks complete.".to_string()
    } else {
        notes.join(", ")
    };

    let mut outcome = CheckOutcome::new(
        CheckKey::Contact,
        score,
        deduction_status(score, penalized),
        note,
    );
    for s in suggestions {
        outcome = outcome.penalize(s);
    }
    outcome
}

pub fn sections(structured: &StructuredRecord) -> CheckOutcome {
    let missing_skills = structured.section_lines(SectionKey::Skills) == 0;
    let missing_education = structured.section_lines(SectionKey::Education) == 0;
    let missing_work = structured.section_lines(SectionKey::Experience) == 0
        && structured.section_lines(SectionKey::Projects) == 0;

    let score = deduct(&[
        (missing_skills, 35),
        (missing_education, 20),
        (missing_work, 35),
    ]);
    let penalized = missing_skills || missing_education || missing_work;

    let mut missing = Vec::new();
    let mut suggestions = Vec::new();
    if missing_skills {
        missing.push("Skills");
        suggestions.push("Add a clear 'Skills' section with keywords (tools, languages, platforms).");
    }
    if missing_education {
        missing.push("Education");
        suggestions.push("Add an 'Education' section with degree + dates.");
    }
    if missing_work {
        missing.push("Experience/Projects");
        suggestions.push("Add 'Experience' or 'Projects' with impact bullets and tech used.");
    }

    let note = if missing.is_empty() {
        "All key sections detected.".to_string()
    } else {
        format!("Missing: {}", missing.join(", "))
    };

    let mut outcome = CheckOutcome::new(
        CheckKey::Sections,
        score,
        deduction_status(score, penalized),
        note,
    );
    for s in suggestions {
        outcome = outcome.penalize(s);
    }
    outcome
}

pub fn impact(text: &str, thresholds: &ScoringThresholds) -> CheckOutcome {
    let metrics = METRIC.find_iter(text).count();
    if metrics < thresholds.min_metric_mentions {
        CheckOutcome::new(
            CheckKey::Impact,
            55,
            CheckStatus::Warn,
            "Few numbers/metrics found.",
        )
        .penalize("Add measurable results: %, time saved, users, revenue, speed, KPIs.")
    } else {
        CheckOutcome::new(
            CheckKey::Impact,
            92,
            CheckStatus::Pass,
            "Good amount of metrics.",
        )
    }
}

/// Most frequent lowercase word of at least `min_chars` characters.
/// Ties go to the word that appeared first.
fn most_repeated(text: &str, min_chars: usize) -> Option<(String, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, word) in WORD
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() >= min_chars)
        .enumerate()
    {
        counts
            .entry(word.to_lowercase())
            .or_insert((0, position))
            .0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(word, (count, _))| (word, count))
}

pub fn repetition(text: &str, thresholds: &ScoringThresholds) -> CheckOutcome {
    match most_repeated(text, thresholds.repetition_min_word_chars) {
        Some((word, count)) if count >= thresholds.repetition_max_count => CheckOutcome::new(
            CheckKey::Repetition,
            65,
            CheckStatus::Warn,
            format!("High repetition of '{word}' ({count}x)."),
        )
        .penalize("Reduce repeated words; vary action verbs and rewrite duplicated phrases."),
        _ => CheckOutcome::new(CheckKey::Repetition, 90, CheckStatus::Pass, "Looks fine."),
    }
}

pub fn brevity(signals: &Signals, thresholds: &ScoringThresholds) -> CheckOutcome {
    if signals.word_count < thresholds.short_word_count {
        CheckOutcome::new(
            CheckKey::Brevity,
            62,
            CheckStatus::Warn,
            "Resume is short (low keyword coverage).",
        )
        .penalize("Add more relevant bullets, projects, tools, and responsibilities.")
    } else if signals.word_count > thresholds.long_word_count {
        CheckOutcome::new(
            CheckKey::Brevity,
            60,
            CheckStatus::Warn,
            "Resume is long (harder to scan).",
        )
        .penalize("Aim for 1–2 pages and prioritize relevant content.")
    } else {
        CheckOutcome::new(
            CheckKey::Brevity,
            92,
            CheckStatus::Pass,
            "Length looks reasonable.",
        )
    }
}

pub fn grammar(text: &str, thresholds: &ScoringThresholds) -> CheckOutcome {
    let caps = SHOUTING.find_iter(text).count();
    let noise = SYMBOL_NOISE.find_iter(text).count();
    if caps > thresholds.caps_words || noise > thresholds.symbol_noise {
        CheckOutcome::new(
            CheckKey::Grammar,
            65,
            CheckStatus::Warn,
            "Formatting noise detected (icons/symbols/caps).",
        )
        .penalize("Avoid too many icons/symbols; keep headings consistent and readable.")
    } else {
        CheckOutcome::new(
            CheckKey::Grammar,
            86,
            CheckStatus::Pass,
            "Basic check only (offline).",
        )
    }
}
