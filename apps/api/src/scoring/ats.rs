//! ATS Scorer — four independent sub-scores (format, content, skills,
//! keyword/relevance) summed into a 0–100 total with ordered advisory feedback.
//!
//! Every sub-score starts at its maximum and loses fixed penalties per triggered
//! rule. Scoring is deterministic: the same `(text, job_description)` always
//! yields an identical `ScoreRecord`.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::lexicon::{Lexicon, SkillCategory};
use crate::analysis::pipeline::LanguagePipeline;
use crate::analysis::sections::{SectionMap, SectionSegmenter};
use crate::analysis::skills::{SkillSet, SkillsExtractor};
use crate::scoring::rules::*;

// ────────────────────────────────────────────────────────────────────────────
// Output record
// ────────────────────────────────────────────────────────────────────────────

/// Result of one scoring call. The total is derived from the four sub-scores at
/// construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    format_score: u32,
    content_score: u32,
    skills_score: u32,
    keyword_score: u32,
    total_score: u32,
    /// TF-IDF cosine against the job description, when one was scored.
    job_similarity: Option<f64>,
    feedback: Vec<String>,
    detected_skills: SkillSet,
}

impl ScoreRecord {
    pub fn format_score(&self) -> u32 {
        self.format_score
    }

    pub fn content_score(&self) -> u32 {
        self.content_score
    }

    pub fn skills_score(&self) -> u32 {
        self.skills_score
    }

    pub fn keyword_score(&self) -> u32 {
        self.keyword_score
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn job_similarity(&self) -> Option<f64> {
        self.job_similarity
    }

    pub fn feedback(&self) -> &[String] {
        &self.feedback
    }

    pub fn detected_skills(&self) -> &SkillSet {
        &self.detected_skills
    }
}

/// Points and the advisory lines one sub-score produced.
#[derive(Debug, Clone, PartialEq)]
struct SubScore {
    points: u32,
    feedback: Vec<String>,
}

impl SubScore {
    fn full(max: u32) -> Self {
        Self {
            points: max,
            feedback: Vec::new(),
        }
    }

    fn penalize(&mut self, penalty: u32, advice: impl Into<String>) {
        self.points = self.points.saturating_sub(penalty);
        self.feedback.push(advice.into());
    }
}

struct KeywordOutcome {
    score: SubScore,
    similarity: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

pub struct AtsScorer {
    lexicon: Arc<Lexicon>,
    pipeline: Arc<dyn LanguagePipeline>,
    segmenter: SectionSegmenter,
    skills: SkillsExtractor,
}

impl AtsScorer {
    pub fn new(lexicon: Arc<Lexicon>, pipeline: Arc<dyn LanguagePipeline>) -> Self {
        Self {
            segmenter: SectionSegmenter::new(lexicon.clone()),
            skills: SkillsExtractor::new(lexicon.clone(), pipeline.clone()),
            lexicon,
            pipeline,
        }
    }

    /// Scores résumé text, optionally against a job description. A blank job
    /// description counts as absent.
    pub fn score(&self, text: &str, job_description: Option<&str>) -> ScoreRecord {
        let sections = self.segmenter.segment(text);
        let detected_skills = self.skills.extract_skills_by_category(text);
        let job_description = job_description.filter(|jd| !jd.trim().is_empty());

        let format = self.format_score(text, &sections);
        let content = self.content_score(text);
        let skills = skills_score(&detected_skills);
        let keyword = self.keyword_score(text, job_description);

        let total_score =
            format.points + content.points + skills.points + keyword.score.points;

        let mut feedback = Vec::new();
        feedback.extend(format.feedback);
        feedback.extend(content.feedback);
        feedback.extend(skills.feedback);
        feedback.extend(keyword.score.feedback);
        if total_score < REVIEW_THRESHOLD {
            feedback.push(FEEDBACK_REVIEW.to_string());
        }
        if total_score < MAJOR_IMPROVEMENT_THRESHOLD {
            feedback.push(FEEDBACK_MAJOR_IMPROVEMENTS.to_string());
        }

        debug!(
            format = format.points,
            content = content.points,
            skills = skills.points,
            keyword = keyword.score.points,
            total = total_score,
            with_job_description = job_description.is_some(),
            "Scored resume"
        );

        ScoreRecord {
            format_score: format.points,
            content_score: content.points,
            skills_score: skills.points,
            keyword_score: keyword.score.points,
            total_score,
            job_similarity: keyword.similarity,
            feedback,
            detected_skills,
        }
    }

    /// Section count uses the substring segmentation; the heading check uses
    /// whole-line equality. The two rules are intentionally different.
    fn format_score(&self, text: &str, sections: &SectionMap) -> SubScore {
        let mut score = SubScore::full(FORMAT_MAX);

        if sections.detected_section_count() < MIN_SECTIONS {
            score.penalize(FORMAT_PENALTY, FEEDBACK_FEW_SECTIONS);
        }
        if self.pipeline.sentences(text).len() < MIN_SENTENCES {
            score.penalize(FORMAT_PENALTY, FEEDBACK_FEW_SENTENCES);
        }
        let exact_headers = text
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| self.lexicon.is_exact_section_header(line))
            .count();
        if exact_headers < MIN_EXACT_HEADERS {
            score.penalize(FORMAT_PENALTY, FEEDBACK_FEW_EXACT_HEADERS);
        }

        score
    }

    fn content_score(&self, text: &str) -> SubScore {
        let mut score = SubScore::full(CONTENT_MAX);

        let words = text.split_whitespace().count();
        if words < MIN_WORDS {
            score.penalize(SHORT_PENALTY, FEEDBACK_TOO_SHORT);
        } else if words > MAX_WORDS {
            score.penalize(LONG_PENALTY, FEEDBACK_TOO_LONG);
        }

        let verbs = self
            .pipeline
            .tokenize(text)
            .iter()
            .filter(|token| is_action_verb(&token.text.to_lowercase()))
            .count();
        if verbs < MIN_ACTION_VERBS {
            score.penalize(ACTION_VERB_PENALTY, FEEDBACK_FEW_VERBS);
        }

        if count_metrics(text) < MIN_METRICS {
            score.penalize(METRIC_PENALTY, FEEDBACK_FEW_METRICS);
        }

        score
    }

    fn keyword_score(&self, text: &str, job_description: Option<&str>) -> KeywordOutcome {
        let mut score = SubScore::full(KEYWORD_MAX);
        let Some(job_description) = job_description else {
            return KeywordOutcome {
                score,
                similarity: None,
            };
        };

        let missing = self.missing_job_terms(text, job_description);
        if !missing.is_empty() {
            let listed: Vec<&str> = missing
                .iter()
                .take(MAX_LISTED_MISSING_TERMS)
                .map(|t| t.as_str())
                .collect();
            score
                .feedback
                .push(format!("{FEEDBACK_MISSING_TERMS_PREFIX}{}", listed.join(", ")));
        }

        match self.pipeline.similarity(text, job_description) {
            Ok(similarity) => {
                let similarity = similarity.clamp(0.0, 1.0);
                // The epsilon keeps an exact match at full marks despite rounding.
                score.points = ((similarity * KEYWORD_MAX as f64) + 1e-9).floor() as u32;
                if similarity < LOW_SIMILARITY {
                    score.feedback.push(FEEDBACK_LOW_MATCH.to_string());
                }
                KeywordOutcome {
                    score,
                    similarity: Some(similarity),
                }
            }
            Err(e) => {
                warn!("Job description similarity unavailable, using default keyword score: {e}");
                score.points = DEGRADED_KEYWORD_SCORE;
                score
                    .feedback
                    .push(FEEDBACK_SIMILARITY_UNAVAILABLE.to_string());
                KeywordOutcome {
                    score,
                    similarity: None,
                }
            }
        }
    }

    /// Job-description key terms (non-stopword, non-punctuation tokens, in
    /// first-occurrence order) that never occur as a résumé token.
    pub fn missing_job_terms(&self, text: &str, job_description: &str) -> Vec<String> {
        let resume_terms: HashSet<String> = self
            .pipeline
            .tokenize(&text.to_lowercase())
            .into_iter()
            .map(|token| token.text)
            .collect();

        let mut seen = HashSet::new();
        self.pipeline
            .tokenize(&job_description.to_lowercase())
            .into_iter()
            .filter(|token| !token.is_punct && !token.is_stop)
            .map(|token| token.text)
            .filter(|term| !resume_terms.contains(term))
            .filter(|term| seen.insert(term.clone()))
            .collect()
    }
}

fn skills_score(detected: &SkillSet) -> SubScore {
    let mut score = SubScore::full(SKILLS_MAX);

    let total = detected.total();
    if total < FEW_SKILLS {
        score.penalize(FEW_SKILLS_PENALTY, FEEDBACK_FEW_SKILLS);
    } else if total < SOME_SKILLS {
        score.penalize(SOME_SKILLS_PENALTY, FEEDBACK_SOME_SKILLS);
    }

    if !detected.has_any(SkillCategory::ProgrammingLanguages)
        && !detected.has_any(SkillCategory::Frameworks)
    {
        score.penalize(NO_CORE_SKILLS_PENALTY, FEEDBACK_NO_CORE_SKILLS);
    }

    score
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
