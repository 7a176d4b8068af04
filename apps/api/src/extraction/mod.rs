//! Text Extractor — turns an uploaded PDF or DOCX into plain text.
//!
//! Each format has an ordered list of strategies. They are tried in sequence on
//! the same input bytes until one yields non-blank text; every failed attempt
//! is recorded and returned with [`ExtractionError::Failed`].

pub mod docx;
pub mod pdf;

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::docx::DocxParagraphStrategy;
use crate::extraction::pdf::{LayoutPdfStrategy, RawPdfStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Maps a filename extension to a format. Legacy `.doc` goes through the
    /// DOCX reader, which only understands the XML container; binary `.doc`
    /// files fail extraction rather than being coerced.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "doc" => {
                debug!(filename, "Routing legacy .doc upload through the DOCX reader");
                Ok(DocumentFormat::Docx)
            }
            _ => Err(ExtractionError::UnsupportedFormat(filename.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::Docx => write!(f, "DOCX"),
        }
    }
}

/// An uploaded file: raw bytes plus the filename carrying its extension.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Bytes,
}

/// Plain text recovered from one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    raw_text: String,
    source_format: DocumentFormat,
}

impl ExtractedDocument {
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn source_format(&self) -> DocumentFormat {
        self.source_format
    }
}

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("parser panicked: {0}")]
    Panicked(String),

    #[error("no text produced")]
    Empty,
}

/// One failed attempt, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format: '{0}'. Please upload a PDF or DOCX file.")]
    UnsupportedFormat(String),

    #[error("Could not extract text from {format} ({} strategies failed)", attempts.len())]
    Failed {
        format: DocumentFormat,
        attempts: Vec<StrategyFailure>,
    },
}

/// A single way of turning file bytes into text.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, data: &[u8]) -> Result<String, StrategyError>;
}

pub struct TextExtractor {
    pdf_strategies: Vec<Box<dyn ExtractionStrategy>>,
    docx_strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl TextExtractor {
    /// PDF: layout-aware first, raw page text second. DOCX: paragraph text.
    pub fn new() -> Self {
        Self::with_strategies(
            vec![Box::new(LayoutPdfStrategy), Box::new(RawPdfStrategy)],
            vec![Box::new(DocxParagraphStrategy)],
        )
    }

    pub fn with_strategies(
        pdf_strategies: Vec<Box<dyn ExtractionStrategy>>,
        docx_strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            pdf_strategies,
            docx_strategies,
        }
    }

    /// Resolves the format from the filename, then extracts.
    pub fn extract_upload(&self, upload: &Upload) -> Result<ExtractedDocument, ExtractionError> {
        let format = DocumentFormat::from_filename(&upload.filename)?;
        self.extract(&upload.data, format)
    }

    pub fn extract(
        &self,
        data: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedDocument, ExtractionError> {
        let strategies = match format {
            DocumentFormat::Pdf => &self.pdf_strategies,
            DocumentFormat::Docx => &self.docx_strategies,
        };

        let mut attempts = Vec::new();
        for strategy in strategies {
            let outcome = strategy
                .extract(data)
                .and_then(|text| if text.trim().is_empty() { Err(StrategyError::Empty) } else { Ok(text) });

            match outcome {
                Ok(raw_text) => {
                    info!(
                        strategy = strategy.name(),
                        bytes = data.len(),
                        chars = raw_text.chars().count(),
                        "Extracted {format} text"
                    );
                    return Ok(ExtractedDocument {
                        raw_text,
                        source_format: format,
                    });
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), "{format} extraction attempt failed: {e}");
                    attempts.push(StrategyFailure {
                        strategy: strategy.name(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(ExtractionError::Failed { format, attempts })
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        result: Result<&'static str, &'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn extract(&self, _data: &[u8]) -> Result<String, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .map(String::from)
                .map_err(|e| StrategyError::Pdf(e.to_string()))
        }
    }

    fn fixed(
        name: &'static str,
        result: Result<&'static str, &'static str>,
    ) -> (Box<dyn ExtractionStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = Box::new(Fixed {
            name,
            result,
            calls: calls.clone(),
        });
        (strategy, calls)
    }

    #[test]
    fn test_format_from_filename() {
        assert_eq!(DocumentFormat::from_filename("cv.PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("cv.docx").unwrap(), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_filename("old.doc").unwrap(), DocumentFormat::Docx);
    }

    #[test]
    fn test_unsupported_format() {
        for name in ["cv.txt", "cv", "cv.pdf.exe"] {
            assert!(matches!(
                DocumentFormat::from_filename(name),
                Err(ExtractionError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn test_first_strategy_wins() {
        let (layout, layout_calls) = fixed("layout", Ok("Jane Doe\nRust"));
        let (raw, raw_calls) = fixed("raw", Ok("unused"));
        let extractor = TextExtractor::with_strategies(vec![layout, raw], vec![]);

        let doc = extractor.extract(b"%PDF", DocumentFormat::Pdf).unwrap();
        assert_eq!(doc.raw_text(), "Jane Doe\nRust");
        assert_eq!(doc.source_format(), DocumentFormat::Pdf);
        assert_eq!(layout_calls.load(Ordering::SeqCst), 1);
        assert_eq!(raw_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_falls_back_on_error_and_on_blank_text() {
        let (broken, _) = fixed("broken", Err("bad xref"));
        let (blank, _) = fixed("blank", Ok("  \n "));
        let (raw, _) = fixed("raw", Ok("recovered"));
        let extractor = TextExtractor::with_strategies(vec![broken, blank, raw], vec![]);

        let doc = extractor.extract(b"%PDF", DocumentFormat::Pdf).unwrap();
        assert_eq!(doc.raw_text(), "recovered");
    }

    #[test]
    fn test_all_strategies_failing_records_attempts() {
        let (layout, _) = fixed("layout", Err("bad xref"));
        let (raw, _) = fixed("raw", Ok(""));
        let extractor = TextExtractor::with_strategies(vec![layout, raw], vec![]);

        match extractor.extract(b"", DocumentFormat::Pdf) {
            Err(ExtractionError::Failed { format, attempts }) => {
                assert_eq!(format, DocumentFormat::Pdf);
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[0].strategy, "layout");
                assert!(attempts[0].reason.contains("bad xref"));
                assert_eq!(attempts[1].reason, "no text produced");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_upload_rejects_unknown_extension_before_extraction() {
        let (docx, calls) = fixed("docx", Ok("text"));
        let extractor = TextExtractor::with_strategies(vec![], vec![docx]);
        let upload = Upload {
            filename: "resume.rtf".to_string(),
            data: Bytes::from_static(b"{\\rtf1}"),
        };
        assert!(matches!(
            extractor.extract_upload(&upload),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_pdf_strategies_fail_cleanly_on_garbage() {
        let extractor = TextExtractor::new();
        match extractor.extract(b"definitely not a pdf", DocumentFormat::Pdf) {
            Err(ExtractionError::Failed { attempts, .. }) => {
                let names: Vec<_> = attempts.iter().map(|a| a.strategy).collect();
                assert_eq!(names, vec!["pdf-layout", "pdf-raw"]);
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
