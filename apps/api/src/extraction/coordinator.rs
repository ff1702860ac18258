//! PDF fallback policy: primary first, fallback only when the primary output is sparse.

use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::extraction::pdf::{fallback_strategy, primary_strategy};
use crate::extraction::{DocumentMeta, TextStrategy};

/// Runs the configured PDF strategies and keeps the better text.
pub fn extract_pdf(bytes: &[u8], config: &AnalysisConfig) -> (String, DocumentMeta) {
    let primary = primary_strategy();
    let fallback = fallback_strategy();
    choose_extraction(primary.as_ref(), fallback.as_ref(), bytes, config)
}

/// Pure two-strategy comparison.
///
/// The fallback runs only when the primary text is shorter than
/// `sparse_text_threshold` characters, and wins only when strictly longer.
/// Whichever meta is not kept is reported under `fallback`.
pub fn choose_extraction(
    primary: &dyn TextStrategy,
    fallback: &dyn TextStrategy,
    bytes: &[u8],
    config: &AnalysisConfig,
) -> (String, DocumentMeta) {
    let first = primary.extract(bytes, config.max_pages);
    let first_len = first.char_len();
    debug!(
        "{:?} produced {first_len} chars from {} pages",
        first.meta.method, first.meta.pages
    );

    if first_len >= config.sparse_text_threshold {
        return (
            first.text,
            DocumentMeta::Pdf {
                primary: first.meta,
                fallback: None,
            },
        );
    }

    let second = fallback.extract(bytes, config.max_pages);
    let second_len = second.char_len();
    debug!(
        "{:?} produced {second_len} chars from {} pages",
        second.meta.method, second.meta.pages
    );

    if second_len > first_len {
        info!(
            "Sparse primary extraction ({first_len} chars); using {:?} ({second_len} chars)",
            second.meta.method
        );
        (
            second.text,
            DocumentMeta::Pdf {
                primary: second.meta,
                fallback: Some(first.meta),
            },
        )
    } else {
        (
            first.text,
            DocumentMeta::Pdf {
                primary: first.meta,
                fallback: Some(second.meta),
            },
        )
    }
}
