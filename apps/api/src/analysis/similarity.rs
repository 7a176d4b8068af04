//! TF-IDF cosine similarity between two documents.
//!
//! The two documents form the whole corpus: terms are lower-cased runs of two or
//! more word characters, idf is smoothed (`ln((1 + n) / (1 + df)) + 1`) and both
//! vectors are L2-normalised before the dot product.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static TERM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("term pattern is a valid regex"));

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("empty vocabulary; documents contain no terms")]
    EmptyVocabulary,
}

fn term_counts(text: &str) -> BTreeMap<String, f64> {
    let lower = text.to_lowercase();
    let mut counts = BTreeMap::new();
    for m in TERM_PATTERN.find_iter(&lower) {
        *counts.entry(m.as_str().to_string()).or_insert(0.0) += 1.0;
    }
    counts
}

fn weighted(counts: &BTreeMap<String, f64>, idf: &BTreeMap<&str, f64>) -> BTreeMap<String, f64> {
    let mut vector: BTreeMap<String, f64> = counts
        .iter()
        .map(|(term, tf)| (term.clone(), tf * idf.get(term.as_str()).copied().unwrap_or(0.0)))
        .collect();
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

/// Cosine similarity in `[0, 1]`. A document without any terms scores 0 against
/// anything; two documents without any terms are an error.
pub fn tfidf_cosine(a: &str, b: &str) -> Result<f64, SimilarityError> {
    let counts_a = term_counts(a);
    let counts_b = term_counts(b);

    let mut document_frequency: BTreeMap<&str, f64> = BTreeMap::new();
    for term in counts_a.keys().chain(counts_b.keys()) {
        *document_frequency.entry(term.as_str()).or_insert(0.0) += 1.0;
    }
    if document_frequency.is_empty() {
        return Err(SimilarityError::EmptyVocabulary);
    }
    if counts_a.is_empty() || counts_b.is_empty() {
        return Ok(0.0);
    }

    let n_docs = 2.0_f64;
    let idf: BTreeMap<&str, f64> = document_frequency
        .into_iter()
        .map(|(term, df)| (term, ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0))
        .collect();

    let vector_a = weighted(&counts_a, &idf);
    let vector_b = weighted(&counts_b, &idf);

    let dot: f64 = vector_a
        .iter()
        .filter_map(|(term, wa)| vector_b.get(term).map(|wb| wa * wb))
        .sum();

    Ok(dot.clamp(0.0, 1.0))
}
