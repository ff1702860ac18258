//! Scalar measurements over the extracted text, shared by the checks and
//! reported back for diagnostics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::{capability, DocumentMeta, ExtractionMethod};
use crate::scoring::ScoringThresholds;

pub(crate) static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[•\-]\s").expect("valid regex"));

static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(20\d{2}|19\d{2})\b").expect("valid regex"));

const COLUMN_GAP: &str = "    ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub pages: usize,
    pub word_count: usize,
    pub char_count: usize,
    /// Rounded to one decimal.
    pub avg_chars_per_page: f64,
    pub likely_scanned_pdf: bool,
    pub possible_columns: bool,
    pub bullet_count: usize,
    pub date_mentions: usize,
    pub extractor: Option<ExtractionMethod>,
    pub primary_pdf_available: bool,
    pub extraction_failed: bool,
}

impl Signals {
    /// Signals for a document that produced no text at all.
    pub fn extraction_failed(meta: &DocumentMeta) -> Self {
        let primary = meta.primary();
        Self {
            pages: primary.pages,
            word_count: 0,
            char_count: 0,
            avg_chars_per_page: 0.0,
            likely_scanned_pdf: true,
            possible_columns: false,
            bullet_count: 0,
            date_mentions: 0,
            extractor: Some(primary.method),
            primary_pdf_available: capability::get().primary_pdf,
            extraction_failed: true,
        }
    }
}

pub fn compute_signals(text: &str, meta: &DocumentMeta, thresholds: &ScoringThresholds) -> Signals {
    let primary = meta.primary();
    let word_count = WORD.find_iter(text).count();
    let char_count = text.chars().count();
    let pages = primary.pages.max(1);

    let per_page = &primary.per_page_characters;
    let avg_chars = if per_page.is_empty() {
        char_count as f64 / pages as f64
    } else {
        per_page.iter().sum::<usize>() as f64 / per_page.len() as f64
    };

    let likely_scanned = char_count < thresholds.scanned_min_chars
        || avg_chars < thresholds.scanned_min_chars_per_page;

    Signals {
        pages,
        word_count,
        char_count,
        avg_chars_per_page: (avg_chars * 10.0).round() / 10.0,
        likely_scanned_pdf: likely_scanned,
        possible_columns: text.matches(COLUMN_GAP).count() > thresholds.column_runs,
        bullet_count: BULLET.find_iter(text).count(),
        date_mentions: YEAR.find_iter(text).count(),
        extractor: Some(primary.method),
        primary_pdf_available: capability::get().primary_pdf,
        extraction_failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionMeta;

    fn pdf_meta(pages: usize, per_page: Vec<usize>) -> DocumentMeta {
        DocumentMeta::Pdf {
            primary: ExtractionMeta {
                pages,
                per_page_characters: per_page,
                ..ExtractionMeta::empty(ExtractionMethod::Lopdf)
            },
            fallback: None,
        }
    }

    #[test]
    fn test_average_uses_per_page_counts() {
        let s = compute_signals(
            "irrelevant",
            &pdf_meta(3, vec![1000, 500]),
            &ScoringThresholds::default(),
        );
        assert_eq!(s.avg_chars_per_page, 750.0);
        assert_eq!(s.pages, 3);
        assert_eq!(s.extractor, Some(ExtractionMethod::Lopdf));
    }

    #[test]
    fn test_average_without_page_counts_uses_text_length() {
        let text = "x".repeat(900);
        let meta = DocumentMeta::Single(ExtractionMeta::empty(ExtractionMethod::Docx));
        let s = compute_signals(&text, &meta, &ScoringThresholds::default());
        assert_eq!(s.pages, 1);
        assert_eq!(s.avg_chars_per_page, 900.0);
        assert!(!s.likely_scanned_pdf);
    }

    #[test]
    fn test_short_text_is_likely_scanned() {
        let s = compute_signals("Jane Doe", &pdf_meta(1, vec![8]), &ScoringThresholds::default());
        assert!(s.likely_scanned_pdf);
    }

    #[test]
    fn test_sparse_pages_are_likely_scanned() {
        let text = "x".repeat(1000);
        let s = compute_signals(&text, &pdf_meta(5, vec![200; 5]), &ScoringThresholds::default());
        assert!(s.likely_scanned_pdf);
    }

    #[test]
    fn test_counts_bullets_years_and_columns() {
        let mut text = String::from("• Shipped v2 in 2021\n- Joined 1999\n- \n");
        for _ in 0..161 {
            text.push_str("a    b\n");
        }
        let s = compute_signals(&text, &pdf_meta(1, vec![]), &ScoringThresholds::default());
        assert_eq!(s.bullet_count, 3);
        assert_eq!(s.date_mentions, 2);
        assert!(s.possible_columns);
    }

    #[test]
    fn test_column_threshold_is_configurable() {
        let text = "a    b    c";
        let thresholds = ScoringThresholds {
            column_runs: 1,
            ..ScoringThresholds::default()
        };
        let s = compute_signals(text, &pdf_meta(1, vec![]), &thresholds);
        assert!(s.possible_columns);
    }

    #[test]
    fn test_failed_signals_flagged() {
        let s = Signals::extraction_failed(&pdf_meta(2, vec![0, 0]));
        assert!(s.extraction_failed);
        assert_eq!(s.pages, 2);
        assert_eq!(s.word_count, 0);
    }
}
