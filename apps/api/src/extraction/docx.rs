//! DOCX strategy: reads `word/document.xml` out of the zip container.
//!
//! Body paragraphs come first, in document order. Each row of a top-level
//! table is then emitted as one line with its non-empty cells joined by `" | "`.
//! Text inside nested tables is skipped.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::extraction::{ExtractError, Extraction, ExtractionMeta, ExtractionMethod, TextStrategy};

const DOCUMENT_PART: &str = "word/document.xml";
const CELL_SEPARATOR: &str = " | ";

pub struct DocxStrategy;

impl TextStrategy for DocxStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Docx
    }

    /// `max_pages` is ignored: DOCX has no fixed pagination.
    fn extract(&self, bytes: &[u8], _max_pages: usize) -> Extraction {
        match read_document_xml(bytes).and_then(|xml| walk_document(&xml)) {
            Ok(body) => {
                debug!(
                    "docx: {} paragraphs, {} tables, {} lines",
                    body.paragraphs,
                    body.tables,
                    body.lines.len()
                );
                Extraction {
                    text: body.lines.join("\n").trim().to_string(),
                    meta: ExtractionMeta {
                        paragraphs: Some(body.paragraphs),
                        tables: Some(body.tables),
                        ..ExtractionMeta::empty(ExtractionMethod::Docx)
                    },
                }
            }
            Err(e) => {
                warn!("docx extraction failed: {e}");
                Extraction::empty(ExtractionMethod::Docx)
            }
        }
    }
}

fn read_document_xml(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut part = archive.by_name(DOCUMENT_PART)?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

#[derive(Debug, Default)]
struct DocumentBody {
    lines: Vec<String>,
    paragraphs: usize,
    tables: usize,
}

/// Cursor state while walking WordprocessingML events.
#[derive(Default)]
struct Walker {
    table_depth: usize,
    in_text_run: bool,
    paragraph: String,
    row: Option<Vec<String>>,
    cell: Option<Vec<String>>,
    body_lines: Vec<String>,
    row_lines: Vec<String>,
    paragraphs: usize,
    tables: usize,
    /// Nesting depth inside text boxes and alternate-content shapes.
    detached_depth: usize,
}

/// Shape containers whose paragraphs float outside the body flow. Word writes
/// each text box twice (`mc:Choice` and `mc:Fallback`), so the whole
/// `AlternateContent` wrapper is skipped along with bare `txbxContent`.
fn is_detached(name: &[u8]) -> bool {
    matches!(name, b"txbxContent" | b"AlternateContent")
}

impl Walker {
    /// Text is only collected in the body and in top-level table cells.
    fn collecting(&self) -> bool {
        self.table_depth <= 1
    }

    fn start(&mut self, name: &[u8]) {
        if is_detached(name) {
            self.detached_depth += 1;
            return;
        }
        if self.detached_depth > 0 {
            return;
        }
        match name {
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.tables += 1;
                }
            }
            b"tr" if self.table_depth == 1 => self.row = Some(Vec::new()),
            b"tc" if self.table_depth == 1 => self.cell = Some(Vec::new()),
            b"p" if self.collecting() => self.paragraph.clear(),
            b"t" => self.in_text_run = true,
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        if is_detached(name) {
            self.detached_depth = self.detached_depth.saturating_sub(1);
            return;
        }
        if self.detached_depth > 0 {
            return;
        }
        match name {
            b"t" => self.in_text_run = false,
            b"p" if self.table_depth == 0 => {
                self.paragraphs += 1;
                let text = self.paragraph.trim();
                if !text.is_empty() {
                    self.body_lines.push(text.to_string());
                }
            }
            b"p" if self.table_depth == 1 => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.push(std::mem::take(&mut self.paragraph));
                }
            }
            b"tc" if self.table_depth == 1 => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.push(cell.join("\n"));
                }
            }
            b"tr" if self.table_depth == 1 => {
                if let Some(row) = self.row.take() {
                    let line = row
                        .iter()
                        .map(|c| c.trim())
                        .filter(|c| !c.is_empty())
                        .collect::<Vec<_>>()
                        .join(CELL_SEPARATOR);
                    if !line.is_empty() {
                        self.row_lines.push(line);
                    }
                }
            }
            b"tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn empty(&mut self, name: &[u8]) {
        if self.detached_depth > 0 {
            return;
        }
        match name {
            b"tab" if self.collecting() => self.paragraph.push('\t'),
            b"br" | b"cr" if self.collecting() => self.paragraph.push('\n'),
            b"p" if self.table_depth == 0 => self.paragraphs += 1,
            b"p" if self.table_depth == 1 => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.push(String::new());
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text_run && self.collecting() && self.detached_depth == 0 {
            self.paragraph.push_str(text);
        }
    }

    fn finish(self) -> DocumentBody {
        let mut lines = self.body_lines;
        lines.extend(self.row_lines);
        DocumentBody {
            lines,
            paragraphs: self.paragraphs,
            tables: self.tables,
        }
    }
}

fn walk_document(xml: &str) -> Result<DocumentBody, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut walker = Walker::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => walker.start(e.local_name().as_ref()),
            Event::End(e) => walker.end(e.local_name().as_ref()),
            Event::Empty(e) => walker.empty(e.local_name().as_ref()),
            Event::Text(t) => walker.text(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(walker.finish())
}

/// Wraps a `<w:body>` fragment into a minimal DOCX container.
#[cfg(test)]
pub(crate) fn build_docx(body: &str) -> Vec<u8> {
    use std::io::Write;

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
