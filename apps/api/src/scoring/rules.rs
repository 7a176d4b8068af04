//! Fixed scoring vocabulary: maxima, thresholds, penalties, action verbs,
//! metric patterns and the advisory strings attached to each rule.

use once_cell::sync::Lazy;
use regex::Regex;

pub const FORMAT_MAX: u32 = 20;
pub const CONTENT_MAX: u32 = 30;
pub const SKILLS_MAX: u32 = 25;
pub const KEYWORD_MAX: u32 = 25;

// Format
pub const MIN_SECTIONS: usize = 4;
pub const MIN_SENTENCES: usize = 10;
pub const MIN_EXACT_HEADERS: usize = 4;
pub const FORMAT_PENALTY: u32 = 5;

// Content
pub const MIN_WORDS: usize = 300;
pub const MAX_WORDS: usize = 1000;
pub const SHORT_PENALTY: u32 = 10;
pub const LONG_PENALTY: u32 = 5;
pub const MIN_ACTION_VERBS: usize = 5;
pub const ACTION_VERB_PENALTY: u32 = 10;
pub const MIN_METRICS: usize = 3;
pub const METRIC_PENALTY: u32 = 5;

// Skills
pub const FEW_SKILLS: usize = 5;
pub const FEW_SKILLS_PENALTY: u32 = 15;
pub const SOME_SKILLS: usize = 10;
pub const SOME_SKILLS_PENALTY: u32 = 10;
pub const NO_CORE_SKILLS_PENALTY: u32 = 5;

// Keyword / relevance
pub const LOW_SIMILARITY: f64 = 0.3;
pub const DEGRADED_KEYWORD_SCORE: u32 = 15;
pub const MAX_LISTED_MISSING_TERMS: usize = 5;

// Overall
pub const REVIEW_THRESHOLD: u32 = 70;
pub const MAJOR_IMPROVEMENT_THRESHOLD: u32 = 50;

pub const ACTION_VERBS: &[&str] = &[
    "developed",
    "implemented",
    "created",
    "managed",
    "led",
    "designed",
    "improved",
    "increased",
    "reduced",
    "achieved",
];

/// Percentages, dollar figures, "N years" and "N+". Matches are summed across
/// patterns, so "5+ years" counts twice.
pub static METRIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+(?:\.\d+)?\s?%",
        r"\$\s?\d[\d,]*(?:\.\d+)?",
        r"(?i)\b\d+\+?\s+years?\b",
        r"\d+\+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("metric pattern is a valid regex"))
    .collect()
});

pub const FEEDBACK_FEW_SECTIONS: &str = "Missing key sections in resume";
pub const FEEDBACK_FEW_SENTENCES: &str = "Resume content seems too brief";
pub const FEEDBACK_FEW_EXACT_HEADERS: &str =
    "Use standard section headings such as Education, Experience and Skills on their own lines";
pub const FEEDBACK_TOO_SHORT: &str = "Resume content is too short";
pub const FEEDBACK_TOO_LONG: &str = "Resume might be too lengthy";
pub const FEEDBACK_FEW_VERBS: &str = "Use more action verbs to describe experiences";
pub const FEEDBACK_FEW_METRICS: &str =
    "Quantify achievements with numbers, percentages or dollar amounts";
pub const FEEDBACK_FEW_SKILLS: &str = "Add more technical skills";
pub const FEEDBACK_SOME_SKILLS: &str = "Consider listing more technical skills";
pub const FEEDBACK_NO_CORE_SKILLS: &str =
    "List the programming languages or frameworks you work with";
pub const FEEDBACK_MISSING_TERMS_PREFIX: &str = "Consider adding these job description keywords: ";
pub const FEEDBACK_LOW_MATCH: &str = "Resume doesn't match job description well";
pub const FEEDBACK_SIMILARITY_UNAVAILABLE: &str =
    "Warning: job description similarity could not be computed; keyword score defaulted to 15";
pub const FEEDBACK_REVIEW: &str = "Consider professional resume review";
pub const FEEDBACK_MAJOR_IMPROVEMENTS: &str = "Major improvements needed in content and format";

/// Total metric-pattern matches in `text`.
pub fn count_metrics(text: &str) -> usize {
    METRIC_PATTERNS
        .iter()
        .map(|pattern| pattern.find_iter(text).count())
        .sum()
}

pub fn is_action_verb(word_lower: &str) -> bool {
    ACTION_VERBS.contains(&word_lower)
}
