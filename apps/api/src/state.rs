use std::sync::Arc;

use crate::analysis::lexicon::Lexicon;
use crate::analysis::pipeline::LanguagePipeline;
use crate::config::Config;
use crate::resume::parser::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Read-only after startup; shared by every request without locking.
    pub parser: Arc<ResumeParser>,
}

impl AppState {
    pub fn new(config: Config, lexicon: Arc<Lexicon>, pipeline: Arc<dyn LanguagePipeline>) -> Self {
        Self {
            config,
            parser: Arc::new(ResumeParser::new(lexicon, pipeline)),
        }
    }
}
