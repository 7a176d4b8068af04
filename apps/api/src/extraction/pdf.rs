//! PDF strategies: `pdf-extract` layout text first, `lopdf` content-stream text second.
//!
//! Both parsers can panic on malformed input, so each call runs under
//! `catch_unwind` and a panic is reported as a failed attempt.

use std::collections::BTreeMap;
use std::panic::{self, UnwindSafe};

use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use tracing::{debug, warn};

use super::{ExtractionStrategy, StrategyError};

/// Layout-preserving extraction via `pdf-extract`. Page breaks become newlines.
pub struct LayoutPdfStrategy;

impl ExtractionStrategy for LayoutPdfStrategy {
    fn name(&self) -> &'static str {
        "pdf-layout"
    }

    fn extract(&self, data: &[u8]) -> Result<String, StrategyError> {
        let text = guarded(|| {
            pdf_extract::extract_text_from_mem(data).map_err(|e| StrategyError::Pdf(e.to_string()))
        })?;
        Ok(text.replace('\u{c}', "\n"))
    }
}

/// Page-by-page raw text via `lopdf`, one newline-terminated block per page.
/// Text-positioning operators start a new line, so headers stay on their own
/// line. A page that fails to decode is skipped.
pub struct RawPdfStrategy;

impl ExtractionStrategy for RawPdfStrategy {
    fn name(&self) -> &'static str {
        "pdf-raw"
    }

    fn extract(&self, data: &[u8]) -> Result<String, StrategyError> {
        guarded(|| {
            let document =
                Document::load_mem(data).map_err(|e| StrategyError::Pdf(e.to_string()))?;

            let pages = document.get_pages();
            debug!(pages = pages.len(), "Extracting raw PDF text page by page");

            let mut text = String::new();
            let mut first_failure = None;
            let mut decoded_pages = 0;
            for (number, page_id) in pages {
                match page_text(&document, page_id) {
                    Ok(page) => {
                        decoded_pages += 1;
                        text.push_str(page.trim_end_matches('\n'));
                        text.push('\n');
                    }
                    Err(e) => {
                        warn!(page = number, "Skipping undecodable PDF page: {e}");
                        if first_failure.is_none() {
                            first_failure = Some(format!("page {number}: {e}"));
                        }
                    }
                }
            }

            match first_failure {
                Some(reason) if decoded_pages == 0 => Err(StrategyError::Pdf(reason)),
                _ => Ok(text),
            }
        })
    }
}

fn page_text(document: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings = document
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, font)| font.get_font_encoding(document).map(|encoding| (name, encoding)))
        .collect::<lopdf::Result<BTreeMap<Vec<u8>, Encoding>>>()?;
    let content = Content::decode(&document.get_page_content(page_id)?)?;

    let mut text = String::new();
    let mut encoding = None;
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|font| font.as_name().ok())
                    .and_then(|font| encodings.get(font));
            }
            "Tj" | "TJ" | "'" | "\"" => {
                if operation.operator != "Tj" && operation.operator != "TJ" {
                    break_line(&mut text);
                }
                if let Some(encoding) = encoding {
                    collect_text(&mut text, encoding, &operation.operands)?;
                }
            }
            // A move with no vertical offset stays on the current line.
            "Td" | "TD" => match operation.operands.get(1).map(Object::as_float) {
                Some(Ok(dy)) if dy.abs() < f32::EPSILON => {
                    if !text.is_empty() && !text.ends_with(char::is_whitespace) {
                        text.push(' ');
                    }
                }
                _ => break_line(&mut text),
            },
            "T*" | "Tm" | "ET" => break_line(&mut text),
            _ => {}
        }
    }
    Ok(text)
}

fn collect_text(text: &mut String, encoding: &Encoding, operands: &[Object]) -> lopdf::Result<()> {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&Document::decode_text(encoding, bytes)?),
            Object::Array(items) => collect_text(text, encoding, items)?,
            // Large negative kerning inside TJ separates words.
            Object::Integer(offset) if *offset < -100 => text.push(' '),
            Object::Real(offset) if *offset < -100.0 => text.push(' '),
            _ => {}
        }
    }
    Ok(())
}

fn break_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

fn guarded<F>(extract: F) -> Result<String, StrategyError>
where
    F: FnOnce() -> Result<String, StrategyError> + UnwindSafe,
{
    panic::catch_unwind(extract).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(StrategyError::Panicked(message))
    })
}
