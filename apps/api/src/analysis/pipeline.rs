//! Language pipeline — the capability interface the segmenter, skills extractor
//! and scorer use for tokens, phrases, sentences and document similarity.
//!
//! `AppState` holds an `Arc<dyn LanguagePipeline>` built once at startup. Any
//! backend implementing the trait can be swapped in without touching the
//! analysis or scoring code. The default `RuleBasedPipeline` is stateless after
//! construction and safe to share across requests.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::similarity::{tfidf_cosine, SimilarityError};
use crate::analysis::stopwords::is_stopword;

/// Words may carry inner `.`, `/`, `-`, `+`, `#` (node.js, ci/cd, scikit-learn),
/// a trailing `+`/`#` (c++, c#) and a leading `.` before a letter (.net). Any
/// other non-space character is a token.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.?\p{L}(?:[\p{L}\p{N}+#./\-]*[\p{L}\p{N}+#])?|\p{N}(?:[\p{L}\p{N}+#./\-]*[\p{L}\p{N}+#])?|[^\s\p{L}\p{N}]")
        .expect("token pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub is_punct: bool,
    pub is_stop: bool,
}

impl Token {
    fn new(text: &str) -> Self {
        let is_punct = !text.chars().any(|c| c.is_alphanumeric());
        let is_stop = !is_punct && is_stopword(&text.to_lowercase());
        Self {
            text: text.to_string(),
            is_punct,
            is_stop,
        }
    }
}

pub trait LanguagePipeline: Send + Sync {
    /// Backend label, logged at startup.
    fn name(&self) -> &'static str;

    /// Tokens in document order, punctuation included.
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Multi-word noun-phrase candidates in document order.
    fn noun_phrases(&self, text: &str) -> Vec<String>;

    /// Non-empty sentences in document order.
    fn sentences(&self, text: &str) -> Vec<String>;

    /// Document similarity in `[0, 1]`.
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError>;
}

/// Deterministic pipeline built from regex tokenization, stopword-delimited
/// phrase chunking and TF-IDF similarity.
#[derive(Debug, Clone)]
pub struct RuleBasedPipeline {
    max_phrase_tokens: usize,
}

impl RuleBasedPipeline {
    pub fn new() -> Self {
        Self {
            max_phrase_tokens: 4,
        }
    }
}

impl Default for RuleBasedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguagePipeline for RuleBasedPipeline {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        TOKEN_PATTERN
            .find_iter(text)
            .map(|m| Token::new(m.as_str()))
            .collect()
    }

    /// Candidate phrases are maximal runs of content words between stopwords or
    /// punctuation. Each run of two or more words is emitted whole, followed by
    /// its contiguous sub-runs of 2..=max_phrase_tokens words.
    fn noun_phrases(&self, text: &str) -> Vec<String> {
        let mut phrases = Vec::new();
        let mut run: Vec<String> = Vec::new();

        let flush = |run: &mut Vec<String>, phrases: &mut Vec<String>| {
            if run.len() >= 2 {
                phrases.push(run.join(" "));
                let max_len = self.max_phrase_tokens.min(run.len());
                for len in 2..=max_len {
                    for window in run.windows(len) {
                        if window.len() < run.len() {
                            phrases.push(window.join(" "));
                        }
                    }
                }
            }
            run.clear();
        };

        for token in self.tokenize(text) {
            if token.is_punct || token.is_stop {
                flush(&mut run, &mut phrases);
            } else {
                run.push(token.text);
            }
        }
        flush(&mut run, &mut phrases);

        phrases
    }

    /// Sentences end at `.`, `!` or `?` followed by whitespace, or at a line break.
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();

        for line in text.lines() {
            let mut current = String::new();
            let mut chars = line.chars().peekable();
            while let Some(c) = chars.next() {
                current.push(c);
                let at_boundary = matches!(c, '.' | '!' | '?')
                    && chars.peek().map_or(true, |next| next.is_whitespace());
                if at_boundary {
                    push_sentence(&mut sentences, &current);
                    current.clear();
                }
            }
            push_sentence(&mut sentences, &current);
        }

        sentences
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        tfidf_cosine(a, b)
    }
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if trimmed.chars().any(|c| c.is_alphanumeric()) {
        sentences.push(trimmed.to_string());
    }
}
