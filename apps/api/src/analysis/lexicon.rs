//! Lexicon: the section-header vocabulary and the categorized skills dictionary.
//!
//! Loaded once at startup and shared read-only (`Arc<Lexicon>`) by the segmenter,
//! the skills extractor and the scorer. Tests build substitute lexicons with
//! [`Lexicon::new`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Skill categories, in the order results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    ProgrammingLanguages,
    Frameworks,
    Databases,
    CloudDevops,
    AiMl,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::ProgrammingLanguages,
        SkillCategory::Frameworks,
        SkillCategory::Databases,
        SkillCategory::CloudDevops,
        SkillCategory::AiMl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::ProgrammingLanguages => "programming_languages",
            SkillCategory::Frameworks => "frameworks",
            SkillCategory::Databases => "databases",
            SkillCategory::CloudDevops => "cloud_devops",
            SkillCategory::AiMl => "ai_ml",
        }
    }
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid lexicon JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Skill '{term}' is listed under both {first} and {second}")]
    DuplicateTerm {
        term: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Lexicon must define at least one section header")]
    NoSectionHeaders,
}

const SECTION_HEADERS: &[&str] = &[
    "education",
    "experience",
    "skills",
    "projects",
    "certifications",
    "summary",
    "objective",
    "work history",
    "professional experience",
    "technical skills",
    "achievements",
    "awards",
    "publications",
    "volunteer",
];

const PROGRAMMING_LANGUAGES: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "golang",
    "rust",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "matlab",
    "perl",
    "sql",
    "bash",
];

const FRAMEWORKS: &[&str] = &[
    "react",
    "angular",
    "vue",
    "node.js",
    "express",
    "django",
    "flask",
    "spring",
    "spring boot",
    "fastapi",
    "rails",
    "laravel",
    "next.js",
    ".net",
    "jquery",
    "tailwind",
];

const DATABASES: &[&str] = &[
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "sqlite",
    "oracle",
    "cassandra",
    "elasticsearch",
    "dynamodb",
    "firebase",
    "mariadb",
    "neo4j",
];

const CLOUD_DEVOPS: &[&str] = &[
    "aws",
    "azure",
    "gcp",
    "google cloud",
    "docker",
    "kubernetes",
    "terraform",
    "jenkins",
    "ansible",
    "ci/cd",
    "git",
    "github actions",
    "linux",
    "nginx",
];

const AI_ML: &[&str] = &[
    "machine learning",
    "deep learning",
    "artificial intelligence",
    "data science",
    "nlp",
    "natural language processing",
    "computer vision",
    "tensorflow",
    "pytorch",
    "keras",
    "scikit-learn",
    "pandas",
    "numpy",
    "llm",
];

/// On-disk shape accepted by [`Lexicon::from_json_file`].
#[derive(Debug, Deserialize)]
struct LexiconFile {
    section_headers: Vec<String>,
    #[serde(default)]
    skills: BTreeMap<SkillCategory, Vec<String>>,
}

/// Immutable vocabulary shared by every analysis component.
#[derive(Debug, Clone)]
pub struct Lexicon {
    section_headers: Vec<String>,
    skills: BTreeMap<SkillCategory, Vec<String>>,
    skill_index: HashMap<String, SkillCategory>,
}

impl Lexicon {
    /// Builds a validated lexicon. Terms are trimmed and lower-cased; blank terms
    /// and repeats inside one category are dropped. A term listed under two
    /// categories is rejected.
    pub fn new(
        section_headers: Vec<String>,
        skills: BTreeMap<SkillCategory, Vec<String>>,
    ) -> Result<Self, LexiconError> {
        let mut headers: Vec<String> = Vec::new();
        for header in section_headers {
            let header = header.trim().to_lowercase();
            if !header.is_empty() && !headers.contains(&header) {
                headers.push(header);
            }
        }
        if headers.is_empty() {
            return Err(LexiconError::NoSectionHeaders);
        }

        let mut normalized: BTreeMap<SkillCategory, Vec<String>> = SkillCategory::ALL
            .iter()
            .map(|category| (*category, Vec::new()))
            .collect();
        let mut skill_index: HashMap<String, SkillCategory> = HashMap::new();

        for (category, terms) in skills {
            for term in terms {
                let term = term.trim().to_lowercase();
                if term.is_empty() {
                    continue;
                }
                match skill_index.get(&term).copied() {
                    Some(existing) if existing == category => continue,
                    Some(existing) => {
                        return Err(LexiconError::DuplicateTerm {
                            term,
                            first: existing.as_str(),
                            second: category.as_str(),
                        })
                    }
                    None => {
                        skill_index.insert(term.clone(), category);
                        normalized.entry(category).or_default().push(term);
                    }
                }
            }
        }

        Ok(Self {
            section_headers: headers,
            skills: normalized,
            skill_index,
        })
    }

    /// The vocabulary compiled into the binary.
    pub fn builtin() -> Self {
        let to_owned = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        let skills = BTreeMap::from([
            (SkillCategory::ProgrammingLanguages, to_owned(PROGRAMMING_LANGUAGES)),
            (SkillCategory::Frameworks, to_owned(FRAMEWORKS)),
            (SkillCategory::Databases, to_owned(DATABASES)),
            (SkillCategory::CloudDevops, to_owned(CLOUD_DEVOPS)),
            (SkillCategory::AiMl, to_owned(AI_ML)),
        ]);
        match Self::new(to_owned(SECTION_HEADERS), skills) {
            Ok(lexicon) => lexicon,
            // The compiled-in tables are covered by test_builtin_lexicon_is_valid.
            Err(e) => unreachable!("built-in lexicon is invalid: {e}"),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(json)?;
        Self::new(file.section_headers, file.skills)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn section_headers(&self) -> &[String] {
        &self.section_headers
    }

    /// Substring rule used by segmentation: the line contains any header term.
    pub fn contains_section_header(&self, line_lower: &str) -> bool {
        self.section_headers
            .iter()
            .any(|header| line_lower.contains(header.as_str()))
    }

    /// Whole-line rule used by the format sub-score.
    pub fn is_exact_section_header(&self, line_lower: &str) -> bool {
        self.section_headers.iter().any(|header| header == line_lower)
    }

    pub fn skills_in(&self, category: SkillCategory) -> &[String] {
        self.skills
            .get(&category)
            .map(|terms| terms.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_skill(&self, term: &str) -> bool {
        self.skill_index.contains_key(term)
    }

    pub fn skill_count(&self) -> usize {
        self.skill_index.len()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn skills(entries: &[(SkillCategory, &[&str])]) -> BTreeMap<SkillCategory, Vec<String>> {
        entries
            .iter()
            .map(|(c, terms)| (*c, terms.iter().map(|t| t.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_builtin_lexicon_is_valid() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.section_headers().contains(&"education".to_string()));
        assert!(lexicon.is_skill("python"));
        assert!(lexicon.is_skill("machine learning"));
        assert!(lexicon
            .skills_in(SkillCategory::CloudDevops)
            .contains(&"docker".to_string()));
    }

    #[test]
    fn test_terms_are_normalized() {
        let lexicon = Lexicon::new(
            vec!["  Education ".to_string()],
            skills(&[(SkillCategory::ProgrammingLanguages, &["  Python", "PYTHON"])]),
        )
        .unwrap();
        assert_eq!(lexicon.section_headers(), &["education".to_string()]);
        assert_eq!(
            lexicon.skills_in(SkillCategory::ProgrammingLanguages),
            &["python".to_string()]
        );
    }

    #[test]
    fn test_term_in_two_categories_is_rejected() {
        let result = Lexicon::new(
            vec!["skills".to_string()],
            skills(&[
                (SkillCategory::ProgrammingLanguages, &["sql"]),
                (SkillCategory::Databases, &["SQL"]),
            ]),
        );
        assert!(matches!(result, Err(LexiconError::DuplicateTerm { .. })));
    }

    #[test]
    fn test_empty_headers_rejected() {
        let result = Lexicon::new(vec!["   ".to_string()], BTreeMap::new());
        assert!(matches!(result, Err(LexiconError::NoSectionHeaders)));
    }

    #[test]
    fn test_missing_categories_are_empty() {
        let lexicon = Lexicon::new(vec!["skills".to_string()], BTreeMap::new()).unwrap();
        for category in SkillCategory::ALL {
            assert!(lexicon.skills_in(category).is_empty());
        }
    }

    #[test]
    fn test_header_rules_differ() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.contains_section_header("professional experience at acme"));
        assert!(!lexicon.is_exact_section_header("professional experience at acme"));
        assert!(lexicon.is_exact_section_header("professional experience"));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"section_headers": ["Skills", "Education"],
                "skills": {{"frameworks": ["Axum"], "ai_ml": ["candle"]}}}}"#
        )
        .unwrap();

        let lexicon = Lexicon::from_json_file(file.path()).unwrap();
        assert_eq!(lexicon.section_headers().len(), 2);
        assert_eq!(lexicon.skills_in(SkillCategory::Frameworks), &["axum".to_string()]);
        assert_eq!(lexicon.skill_count(), 2);
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = Lexicon::from_json_file(Path::new("/nonexistent/lexicon.json"));
        assert!(matches!(result, Err(LexiconError::Io { .. })));
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(matches!(
            Lexicon::from_json_str("{not json"),
            Err(LexiconError::Parse(_))
        ));
    }
}
