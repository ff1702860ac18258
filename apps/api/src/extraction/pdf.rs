//! PDF strategies: pdf-extract (primary, optional) and lopdf (fallback).

use tracing::{debug, warn};

use crate::extraction::{
    capability, ExtractError, Extraction, ExtractionMeta, ExtractionMethod, TextStrategy,
    UnavailableStrategy,
};

/// Builds an extraction from the texts of the pages that were read.
fn from_pages(method: ExtractionMethod, total_pages: usize, page_texts: Vec<String>) -> Extraction {
    let per_page_characters = page_texts.iter().map(|t| t.chars().count()).collect();
    Extraction {
        text: page_texts.join("\n").trim().to_string(),
        meta: ExtractionMeta {
            method,
            pages: total_pages,
            per_page_characters,
            paragraphs: None,
            tables: None,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// pdf-extract
// ────────────────────────────────────────────────────────────────────────────

/// Layout-aware extraction with ToUnicode/CID font handling.
#[cfg(feature = "pdf-extract")]
pub struct PdfExtractStrategy;

#[cfg(feature = "pdf-extract")]
impl PdfExtractStrategy {
    fn decode(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        // pdf-extract panics on some malformed font programs.
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| ExtractError::PdfPanic)?
            .map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

#[cfg(feature = "pdf-extract")]
impl TextStrategy for PdfExtractStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfExtract
    }

    /// Pages past `max_pages` are cut with lopdf before decoding, since
    /// pdf-extract always decodes the whole document it is given.
    fn extract(&self, bytes: &[u8], max_pages: usize) -> Extraction {
        let (known_total, decoded) = match truncate_pages(bytes, max_pages) {
            Some((total, trimmed)) => (Some(total), Self::decode(&trimmed)),
            None => (None, Self::decode(bytes)),
        };
        match decoded {
            Ok(pages) => {
                let total = known_total.unwrap_or(pages.len());
                let read: Vec<String> = pages.into_iter().take(max_pages).collect();
                debug!("pdf-extract read {}/{} pages", read.len(), total);
                from_pages(self.method(), total, read)
            }
            Err(e) => {
                warn!("pdf-extract failed: {e}");
                Extraction::empty(self.method())
            }
        }
    }
}

/// Rewrites the document without the pages past `max_pages`, returning the
/// original page count with it. `None` when nothing needs cutting or lopdf
/// cannot round-trip the file; the caller then decodes the bytes as given.
#[cfg(feature = "pdf-extract")]
fn truncate_pages(bytes: &[u8], max_pages: usize) -> Option<(usize, Vec<u8>)> {
    let mut doc = lopdf::Document::load_mem(bytes).ok()?;
    let total = doc.get_pages().len();
    if total <= max_pages {
        return None;
    }

    // Delete from the back so page numbers stay valid.
    let mut extra: Vec<u32> = doc.get_pages().keys().skip(max_pages).copied().collect();
    extra.reverse();
    for page_number in extra {
        doc.delete_pages(&[page_number]);
    }
    doc.prune_objects();

    let mut trimmed = Vec::new();
    if let Err(e) = doc.save_to(&mut trimmed) {
        debug!("could not rewrite truncated PDF: {e}");
        return None;
    }
    debug!("truncated PDF from {total} to {max_pages} pages before decoding");
    Some((total, trimmed))
}

// ────────────────────────────────────────────────────────────────────────────
// lopdf
// ────────────────────────────────────────────────────────────────────────────

/// Content-stream text operators via lopdf. Always compiled in.
pub struct LopdfStrategy;

impl LopdfStrategy {
    fn decode(bytes: &[u8], max_pages: usize) -> Result<(usize, Vec<String>), ExtractError> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
        let pages = doc.get_pages();
        let texts = pages
            .keys()
            .take(max_pages)
            .map(|&page_number| match doc.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    debug!("lopdf could not read page {page_number}: {e}");
                    String::new()
                }
            })
            .collect();
        Ok((pages.len(), texts))
    }
}

impl TextStrategy for LopdfStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Lopdf
    }

    fn extract(&self, bytes: &[u8], max_pages: usize) -> Extraction {
        match Self::decode(bytes, max_pages) {
            Ok((total, read)) => {
                debug!("lopdf read {}/{} pages", read.len(), total);
                from_pages(self.method(), total, read)
            }
            Err(e) => {
                warn!("lopdf failed: {e}");
                Extraction::empty(self.method())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy selection
// ────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "pdf-extract")]
fn compiled_primary() -> Box<dyn TextStrategy> {
    Box::new(PdfExtractStrategy)
}

#[cfg(not(feature = "pdf-extract"))]
fn compiled_primary() -> Box<dyn TextStrategy> {
    Box::new(UnavailableStrategy)
}

/// The primary strategy, or the unavailable stand-in when the capability is off.
pub fn primary_strategy() -> Box<dyn TextStrategy> {
    if capability::get().primary_pdf {
        compiled_primary()
    } else {
        Box::new(UnavailableStrategy)
    }
}

pub fn fallback_strategy() -> Box<dyn TextStrategy> {
    Box::new(LopdfStrategy)
}
