//! End-to-end analysis of one uploaded document.
//!
//! Synchronous and CPU-bound. The web layer runs it on the blocking pool.

use serde::Serialize;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::extraction::{extract_pdf, DocumentKind, DocumentMeta, DocxStrategy, TextStrategy};
use crate::parsing::{extract_structured, StructuredRecord};
use crate::scoring::{compute_dashboard, DashboardScore};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub meta: DocumentMeta,
    pub structured: StructuredRecord,
    pub dashboard: DashboardScore,
}

/// Extract → structure → score. Never fails: undecodable input yields an
/// empty record and the degraded dashboard.
pub fn analyze_document(bytes: &[u8], kind: DocumentKind, config: &AnalysisConfig) -> AnalysisReport {
    let (text, meta) = match kind {
        DocumentKind::Pdf => extract_pdf(bytes, config),
        DocumentKind::Docx => {
            let extraction = DocxStrategy.extract(bytes, config.max_pages);
            (extraction.text, DocumentMeta::Single(extraction.meta))
        }
    };

    let structured = extract_structured(&text);
    let dashboard = compute_dashboard(&text, &meta, &structured, &config.scoring);

    info!(
        "Analyzed {:?} ({} bytes) via {:?}: score={} grade={} issues={}",
        kind,
        bytes.len(),
        meta.primary().method,
        dashboard.score,
        dashboard.grade,
        dashboard.issues
    );

    AnalysisReport {
        meta,
        structured,
        dashboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::docx::build_docx;
    use crate::extraction::ExtractionMethod;
    use crate::scoring::Grade;

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    #[test]
    fn test_docx_end_to_end() {
        let body = [
            "Jane Doe",
            "jane.doe@example.com | +1 415 555 0100",
            "Skills",
            "Python, Go, Rust",
            "Education",
            "BSc Computer Science, 2016",
        ]
        .iter()
        .map(|l| para(l))
        .collect::<String>();

        let report = analyze_document(
            &build_docx(&body),
            DocumentKind::Docx,
            &AnalysisConfig::default(),
        );

        assert_eq!(report.meta.primary().method, ExtractionMethod::Docx);
        assert_eq!(report.structured.name.as_deref(), Some("Jane Doe"));
        assert_eq!(report.structured.skills, ["Python", "Go", "Rust"]);
        assert_eq!(report.dashboard.checks.len(), 7);
        assert!(!report.dashboard.signals.extraction_failed);
    }

    #[test]
    fn test_garbage_pdf_degrades() {
        let report = analyze_document(
            b"definitely not a pdf",
            DocumentKind::Pdf,
            &AnalysisConfig::default(),
        );
        assert_eq!(report.structured, StructuredRecord::default());
        assert_eq!(report.dashboard.score, 20);
        assert_eq!(report.dashboard.grade, Grade::NeedsWork);
        assert!(report.dashboard.signals.extraction_failed);
    }

    #[test]
    fn test_garbage_docx_degrades() {
        let report = analyze_document(
            &[0u8; 512],
            DocumentKind::Docx,
            &AnalysisConfig::default(),
        );
        assert!(report.dashboard.checks.is_empty());
        assert_eq!(report.dashboard.ats_parse_rate, 10);
    }

    #[test]
    fn test_report_serializes_top_level_keys() {
        let report = analyze_document(b"", DocumentKind::Docx, &AnalysisConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["meta"]["method"], "docx");
        assert_eq!(json["dashboard"]["grade"], "Needs work");
        assert!(json["structured"]["contacts"]["emails"].is_array());
    }
}
