//! Parsed-Data Aggregator — the single entry point that turns one upload into a
//! `ParsedResult`: extraction, segmentation, flat skills and a baseline score.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::lexicon::Lexicon;
use crate::analysis::pipeline::LanguagePipeline;
use crate::analysis::sections::{SectionMap, SectionSegmenter};
use crate::analysis::skills::{SkillSet, SkillsExtractor};
use crate::extraction::{DocumentFormat, ExtractionError, TextExtractor, Upload};
use crate::scoring::ats::{AtsScorer, ScoreRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedResult {
    pub full_text: String,
    pub sections: SectionMap,
    pub skills: BTreeSet<String>,
    pub word_count: usize,
    pub scores: ScoreRecord,
    pub source_format: DocumentFormat,
}

pub struct ResumeParser {
    extractor: TextExtractor,
    segmenter: SectionSegmenter,
    skills: SkillsExtractor,
    scorer: AtsScorer,
}

impl ResumeParser {
    pub fn new(lexicon: Arc<Lexicon>, pipeline: Arc<dyn LanguagePipeline>) -> Self {
        Self::with_extractor(TextExtractor::new(), lexicon, pipeline)
    }

    pub fn with_extractor(
        extractor: TextExtractor,
        lexicon: Arc<Lexicon>,
        pipeline: Arc<dyn LanguagePipeline>,
    ) -> Self {
        Self {
            extractor,
            segmenter: SectionSegmenter::new(lexicon.clone()),
            skills: SkillsExtractor::new(lexicon.clone(), pipeline.clone()),
            scorer: AtsScorer::new(lexicon, pipeline),
        }
    }

    /// Returns `Ok(None)` when no text could be recovered from the file; an
    /// unsupported extension is an error and nothing is extracted.
    pub fn parse(&self, upload: &Upload) -> Result<Option<ParsedResult>, ExtractionError> {
        let document = match self.extractor.extract_upload(upload) {
            Ok(document) => document,
            Err(ExtractionError::Failed { format, attempts }) => {
                warn!(
                    filename = %upload.filename,
                    ?attempts,
                    "No text recovered from {format} upload"
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let full_text = document.raw_text().to_string();
        let sections = self.segmenter.segment(&full_text);
        let skills = self.skills.extract_skills(&full_text);
        let word_count = full_text.split_whitespace().count();
        let scores = self.scorer.score(&full_text, None);

        info!(
            filename = %upload.filename,
            word_count,
            sections = sections.len(),
            has_degree = sections.degree().is_some(),
            skills = skills.len(),
            categorized_skills = scores.detected_skills().total(),
            format_score = scores.format_score(),
            content_score = scores.content_score(),
            skills_score = scores.skills_score(),
            keyword_score = scores.keyword_score(),
            total_score = scores.total_score(),
            feedback = scores.feedback().len(),
            "Parsed resume"
        );

        Ok(Some(ParsedResult {
            full_text,
            sections,
            skills,
            word_count,
            scores,
            source_format: document.source_format(),
        }))
    }

    /// Re-scores an already parsed résumé once a job description is known.
    /// The input record is consumed and a new one returned.
    pub fn rescore(&self, parsed: ParsedResult, job_description: &str) -> ParsedResult {
        let scores = self.scorer.score(&parsed.full_text, Some(job_description));
        info!(
            keyword_score = scores.keyword_score(),
            similarity = ?scores.job_similarity(),
            total_score = scores.total_score(),
            "Rescored resume against job description"
        );
        ParsedResult { scores, ..parsed }
    }

    pub fn score(&self, text: &str, job_description: Option<&str>) -> ScoreRecord {
        self.scorer.score(text, job_description)
    }

    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        self.skills.extract_skills(text)
    }

    pub fn extract_skills_by_category(&self, text: &str) -> SkillSet {
        self.skills.extract_skills_by_category(text)
    }
}
