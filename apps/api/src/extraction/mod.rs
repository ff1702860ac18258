//! Text extraction: per-format strategies plus the PDF fallback coordinator.
//!
//! Strategies never fail outward. A decoder error is logged and reported as an
//! empty extraction so the rest of the pipeline can still produce a dashboard.

pub mod capability;
pub mod coordinator;
pub mod docx;
pub mod pdf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use coordinator::extract_pdf;
pub use docx::DocxStrategy;

// ────────────────────────────────────────────────────────────────────────────
// Metadata types
// ────────────────────────────────────────────────────────────────────────────

/// Which backend produced a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Primary PDF backend (optional at build and run time).
    PdfExtract,
    /// Fallback PDF backend, always present.
    Lopdf,
    Docx,
    /// The requested backend is not available in this process.
    Unavailable,
}

/// What a single strategy saw while decoding a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMeta {
    pub method: ExtractionMethod,
    /// Total pages reported by the decoder, not just the ones read.
    pub pages: usize,
    /// Character counts of the pages actually read, in page order.
    pub per_page_characters: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<usize>,
}

impl ExtractionMeta {
    pub fn empty(method: ExtractionMethod) -> Self {
        Self {
            method,
            pages: 0,
            per_page_characters: Vec::new(),
            paragraphs: None,
            tables: None,
        }
    }
}

/// Text plus the metadata of the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub meta: ExtractionMeta,
}

impl Extraction {
    pub fn empty(method: ExtractionMethod) -> Self {
        Self {
            text: String::new(),
            meta: ExtractionMeta::empty(method),
        }
    }

    /// Length in characters, the comparator used when choosing between strategies.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Metadata attached to an analysis. PDFs carry both coordinator attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentMeta {
    Pdf {
        primary: ExtractionMeta,
        fallback: Option<ExtractionMeta>,
    },
    Single(ExtractionMeta),
}

impl DocumentMeta {
    /// Metadata of the strategy whose text was kept.
    pub fn primary(&self) -> &ExtractionMeta {
        match self {
            DocumentMeta::Pdf { primary, .. } => primary,
            DocumentMeta::Single(meta) => meta,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy seam
// ────────────────────────────────────────────────────────────────────────────

/// A single way of turning document bytes into text.
pub trait TextStrategy: Send + Sync {
    fn method(&self) -> ExtractionMethod;

    /// Decodes at most `max_pages` pages. Must not panic or fail; decoder
    /// problems surface as an empty extraction.
    fn extract(&self, bytes: &[u8], max_pages: usize) -> Extraction;
}

/// Stand-in for a backend that is not available in this process.
pub struct UnavailableStrategy;

impl TextStrategy for UnavailableStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Unavailable
    }

    fn extract(&self, _bytes: &[u8], _max_pages: usize) -> Extraction {
        Extraction::empty(ExtractionMethod::Unavailable)
    }
}

/// Decoder failures. Only ever logged; strategies translate them into empty output.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF decode failed: {0}")]
    Pdf(String),

    #[error("PDF decoder panicked")]
    PdfPanic,

    #[error("DOCX container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Document kind sniffing (web boundary helper)
// ────────────────────────────────────────────────────────────────────────────

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Picks the kind from the filename extension, then from the declared
    /// content type. Returns `None` for anything else.
    pub fn sniff(filename: &str, content_type: Option<&str>) -> Option<Self> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".pdf") {
            return Some(DocumentKind::Pdf);
        }
        if lower.ends_with(".docx") {
            return Some(DocumentKind::Docx);
        }
        match content_type.map(|c| c.split(';').next().unwrap_or("").trim()) {
            Some("application/pdf") => Some(DocumentKind::Pdf),
            Some(ct) if ct == DOCX_CONTENT_TYPE => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}
