use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use encoding_rs::{BIG5, UTF_16BE};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::error::BatchError;
use crate::model::PageText;
use crate::options::PageSelection;
use crate::table_parse::table_row_cells;

/// Where a page's text came from. Variants are listed in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TextSource {
    ContentStream,
    PdfExtract,
    Lopdf,
}

#[derive(Debug)]
struct Candidate {
    source: TextSource,
    text: String,
}

impl Candidate {
    fn table_lines(&self) -> usize {
        self.text
            .lines()
            .filter(|line| table_row_cells(line, 2).is_some())
            .count()
    }

    /// A candidate made mostly of replacement or control characters was
    /// decoded with the wrong encoding.
    fn is_garbled(&self) -> bool {
        garbled(&self.text)
    }
}

fn garbled(text: &str) -> bool {
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }
    let total = text.chars().count();
    let bad = text
        .chars()
        .filter(|&ch| ch == '\u{FFFD}' || (ch.is_control() && !ch.is_whitespace()))
        .count();
    total > 0 && bad * 8 > total
}

fn decode_pdf_string(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !garbled(&decoded) {
        return decoded;
    }

    let hint = encoding.map(str::to_ascii_lowercase).unwrap_or_default();
    let has_hint = |needles: &[&str]| needles.iter().any(|needle| hint.contains(needle));

    let utf16_body = if bytes.starts_with(&[0xFE, 0xFF]) {
        Some(&bytes[2..])
    } else if has_hint(&["utf16", "ucs2", "identity-h", "unicode"]) {
        Some(bytes)
    } else {
        None
    };
    if let Some(body) = utf16_body {
        let (text, had_errors) = UTF_16BE.decode_without_bom_handling(body);
        if !had_errors && !text.is_empty() {
            return text.into_owned();
        }
    }

    if has_hint(&["big5", "b5", "eten", "cns"]) {
        let (text, _, had_errors) = BIG5.decode(bytes);
        if !had_errors && !text.is_empty() {
            return text.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Walks the page's content stream, starting a new line on every text
/// positioning operator.
fn content_stream_text(document: &Document, page_id: ObjectId) -> Option<String> {
    fn push_operands(line: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => line.push_str(&decode_pdf_string(encoding, bytes)),
                Object::Array(items) => {
                    push_operands(line, encoding, items);
                    line.push(' ');
                }
                // Large negative kerning in a TJ array is a visual gap.
                Object::Integer(shift) if *shift < -100 => line.push(' '),
                _ => {}
            }
        }
    }

    let content = Content::decode(&document.get_page_content(page_id).ok()?).ok()?;
    let font_encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .and_then(|name| font_encodings.get(name).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => push_operands(&mut line, encoding, &operation.operands),
            "T*" | "Td" | "TD" | "Tm" | "ET" if !line.trim().is_empty() => {
                lines.push(std::mem::take(&mut line));
            }
            _ => {}
        }
    }
    if !line.trim().is_empty() {
        lines.push(line);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Per-page text from `pdf-extract`, which panics on some malformed input
/// instead of returning an error.
fn pdf_extract_pages(bytes: &[u8], path: &Path) -> Option<Vec<String>> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(pages)) => Some(pages),
        Ok(Err(error)) => {
            debug!(path = %path.display(), %error, "pdf-extract could not read document text");
            None
        }
        Err(_) => {
            debug!(path = %path.display(), "pdf-extract panicked on document");
            None
        }
    }
}

/// Keeps the candidate with the most table-like lines. Garbled text loses to
/// clean text, and ties go to the earlier [`TextSource`].
fn best_text(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates
        .into_iter()
        .filter(|candidate| !candidate.text.trim().is_empty())
        .max_by_key(|candidate| {
            (
                !candidate.is_garbled(),
                candidate.table_lines(),
                Reverse(candidate.source),
            )
        })
}

/// Loads `input_pdf` and recovers the text of each selected page.
///
/// Each page's text is taken from that page alone, so a table is only ever
/// reported on the page that holds it.
///
/// # Errors
///
/// Fails only when the file cannot be read or parsed as a PDF. A selection
/// that matches no page yields an empty list.
pub(crate) fn read_pdf_pages(
    input_pdf: &Path,
    page_selection: Option<&PageSelection>,
) -> Result<Vec<PageText>, BatchError> {
    let bytes = std::fs::read(input_pdf).map_err(|error| BatchError::unreadable(input_pdf, error))?;
    let document =
        Document::load_mem(&bytes).map_err(|error| BatchError::unreadable(input_pdf, error))?;
    let page_ids = document.get_pages();

    // Page-aligned only; a count mismatch means the split cannot be trusted.
    let extracted = pdf_extract_pages(&bytes, input_pdf)
        .filter(|pages| pages.len() == page_ids.len())
        .unwrap_or_default();

    let mut pages = Vec::new();
    for (index, (&page_number, &page_id)) in page_ids.iter().enumerate() {
        if page_selection.is_some_and(|selection| !selection.contains(page_number)) {
            continue;
        }

        let mut candidates = Vec::with_capacity(3);
        if let Some(text) = content_stream_text(&document, page_id) {
            candidates.push(Candidate {
                source: TextSource::ContentStream,
                text,
            });
        }
        if let Some(text) = extracted.get(index) {
            candidates.push(Candidate {
                source: TextSource::PdfExtract,
                text: text.clone(),
            });
        }
        if let Ok(text) = document.extract_text(&[page_number]) {
            candidates.push(Candidate {
                source: TextSource::Lopdf,
                text,
            });
        }

        let text = match best_text(candidates) {
            Some(candidate) => {
                debug!(page = page_number, source = ?candidate.source, "recovered page text");
                candidate.text
            }
            None => String::new(),
        };
        pages.push(PageText { page_number, text });
    }

    if pages.is_empty() && !page_ids.is_empty() {
        warn!(path = %input_pdf.display(), "page selection matches no page of this document");
    }

    Ok(pages)
}
