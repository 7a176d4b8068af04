//! DOCX strategy: paragraph text from `word/document.xml`, one paragraph per line.

use std::io::{Cursor, Read};

use roxmltree::Node;
use zip::ZipArchive;

use super::{ExtractionStrategy, StrategyError};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxParagraphStrategy;

impl ExtractionStrategy for DocxParagraphStrategy {
    fn name(&self) -> &'static str {
        "docx-paragraphs"
    }

    fn extract(&self, data: &[u8]) -> Result<String, StrategyError> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| StrategyError::Docx(format!("not a DOCX (zip) container: {e}")))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| StrategyError::Docx(format!("missing {DOCUMENT_PART}: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| StrategyError::Docx(format!("failed to read {DOCUMENT_PART}: {e}")))?;

        let document = roxmltree::Document::parse(&xml)
            .map_err(|e| StrategyError::Docx(format!("invalid document XML: {e}")))?;

        let mut text = String::new();
        for paragraph in document
            .descendants()
            .filter(|n| n.has_tag_name((WORD_NS, "p")))
        {
            text.push_str(&paragraph_text(paragraph));
            text.push('\n');
        }
        Ok(text)
    }
}

/// Run text of one paragraph. Text belonging to a nested paragraph (text boxes)
/// is left to that paragraph.
fn paragraph_text(paragraph: Node) -> String {
    let mut text = String::new();
    for node in paragraph.descendants().filter(|n| n.is_element()) {
        let owner = node
            .ancestors()
            .skip(1)
            .find(|a| a.has_tag_name((WORD_NS, "p")));
        if owner != Some(paragraph) {
            continue;
        }
        if node.has_tag_name((WORD_NS, "t")) {
            text.push_str(node.text().unwrap_or_default());
        } else if node.has_tag_name((WORD_NS, "tab")) {
            text.push('\t');
        } else if node.has_tag_name((WORD_NS, "br")) || node.has_tag_name((WORD_NS, "cr")) {
            text.push('\n');
        }
    }
    text
}
