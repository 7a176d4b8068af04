//! Skills Extractor.
//!
//! Two matching strategies over the same lexicon:
//! - `extract_skills`: exact equality of pipeline tokens and noun phrases
//!   against lexicon terms (flat set, fed to the parsed result).
//! - `extract_skills_by_category`: substring containment of each lexicon term
//!   in the lower-cased text (categorized, fed to the scorer). Looser on purpose;
//!   "java" is found inside "javascript".

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::analysis::lexicon::{Lexicon, SkillCategory};
use crate::analysis::pipeline::LanguagePipeline;

/// Matched skills per category. Every category is present, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeMap<SkillCategory, BTreeSet<String>>);

impl SkillSet {
    pub fn new() -> Self {
        Self(
            SkillCategory::ALL
                .iter()
                .map(|category| (*category, BTreeSet::new()))
                .collect(),
        )
    }

    fn insert(&mut self, category: SkillCategory, skill: &str) {
        self.0.entry(category).or_default().insert(skill.to_string());
    }

    pub fn get(&self, category: SkillCategory) -> Option<&BTreeSet<String>> {
        self.0.get(&category)
    }

    pub fn has_any(&self, category: SkillCategory) -> bool {
        self.get(category).is_some_and(|skills| !skills.is_empty())
    }

    /// Sum of matches across all categories.
    pub fn total(&self) -> usize {
        self.0.values().map(|skills| skills.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, &BTreeSet<String>)> {
        self.0.iter().map(|(category, skills)| (*category, skills))
    }
}

impl Default for SkillSet {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SkillsExtractor {
    lexicon: Arc<Lexicon>,
    pipeline: Arc<dyn LanguagePipeline>,
}

impl SkillsExtractor {
    pub fn new(lexicon: Arc<Lexicon>, pipeline: Arc<dyn LanguagePipeline>) -> Self {
        Self { lexicon, pipeline }
    }

    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        let lower = text.to_lowercase();
        let mut skills = BTreeSet::new();

        for token in self.pipeline.tokenize(&lower) {
            if self.lexicon.is_skill(&token.text) {
                skills.insert(token.text);
            }
        }
        for phrase in self.pipeline.noun_phrases(&lower) {
            if self.lexicon.is_skill(&phrase) {
                skills.insert(phrase);
            }
        }

        debug!(count = skills.len(), "Extracted flat skills");
        skills
    }

    pub fn extract_skills_by_category(&self, text: &str) -> SkillSet {
        let lower = text.to_lowercase();
        let mut skills = SkillSet::new();

        for category in SkillCategory::ALL {
            for term in self.lexicon.skills_in(category) {
                if lower.contains(term.as_str()) {
                    skills.insert(category, term);
                }
            }
        }

        debug!(
            total = skills.total(),
            by_category = ?skills
                .iter()
                .map(|(category, terms)| (category.as_str(), terms.len()))
                .collect::<Vec<_>>(),
            "Extracted categorized skills"
        );
        skills
    }
}
