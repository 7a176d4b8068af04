//! Section Segmenter — splits résumé text into header-keyed blocks and mines
//! the education block for a degree phrase.

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::analysis::lexicon::Lexicon;

/// Bucket for content that precedes the first recognised header.
pub const UNKNOWN_SECTION: &str = "unknown";
/// Derived key holding the degree span mined from the education block.
pub const DEGREE_KEY: &str = "degree";

const EDUCATION_MARKER: &str = "education";

/// Tried in order; only the first pattern with a match is used.
static DEGREE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:bachelor|master|phd|doctorate|b\.?s\.?|b\.?a\.?|m\.?s\.?|m\.?a\.?|ph\.?d\.?|b\.?tech|m\.?tech)",
        r"(?i)(?:bachelor's|master's)",
        r"(?i)(?:degree in|major in)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("degree pattern is a valid regex"))
    .collect()
});

/// Section name → raw text block, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SectionMap(IndexMap<String, String>);

impl SectionMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of segmented sections, not counting the derived degree key.
    pub fn detected_section_count(&self) -> usize {
        self.0.keys().filter(|k| k.as_str() != DEGREE_KEY).count()
    }

    pub fn degree(&self) -> Option<&str> {
        self.get(DEGREE_KEY)
    }

    /// Content of the first section whose key mentions education.
    pub fn education(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() != DEGREE_KEY && k.contains(EDUCATION_MARKER))
            .map(|(_, v)| v.as_str())
    }

    /// Appends to an existing key so a repeated header never drops content.
    fn flush(&mut self, key: &str, lines: &mut Vec<String>) {
        if lines.is_empty() {
            return;
        }
        let block = lines.join("\n");
        lines.clear();
        match self.0.get_mut(key) {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(&block);
            }
            None => {
                self.0.insert(key.to_string(), block);
            }
        }
    }
}

pub struct SectionSegmenter {
    lexicon: Arc<Lexicon>,
}

impl SectionSegmenter {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// A line is a header when its lower-cased text contains any lexicon header
    /// term; the whole lower-cased line becomes the section key.
    pub fn segment(&self, text: &str) -> SectionMap {
        let mut sections = SectionMap::default();
        let mut current_key = UNKNOWN_SECTION.to_string();
        let mut current_lines: Vec<String> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line_lower = line.to_lowercase();
            if self.lexicon.contains_section_header(&line_lower) {
                sections.flush(&current_key, &mut current_lines);
                current_key = line_lower;
            } else {
                current_lines.push(line.to_string());
            }
        }
        sections.flush(&current_key, &mut current_lines);

        if let Some(degree) = sections.education().and_then(mine_degree) {
            sections.0.insert(DEGREE_KEY.to_string(), degree);
        }

        debug!(
            keys = ?sections.iter().map(|(key, _)| key).collect::<Vec<_>>(),
            has_degree = sections.degree().is_some(),
            "Segmented resume text"
        );
        sections
    }
}

/// Returns the period-delimited span around the first degree mention.
pub fn mine_degree(education: &str) -> Option<String> {
    let text = education.to_lowercase();
    let found = DEGREE_PATTERNS.iter().find_map(|pattern| pattern.find(&text))?;

    let start = text[..found.start()].rfind('.').map_or(0, |i| i + 1);
    let end = text[found.end()..]
        .find('.')
        .map_or(text.len(), |i| found.end() + i);

    let span = text[start..end].trim();
    if span.is_empty() {
        None
    } else {
        Some(span.to_string())
    }
}
