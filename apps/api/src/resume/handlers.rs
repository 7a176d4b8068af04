use std::collections::BTreeSet;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info_span;
use uuid::Uuid;

use crate::analysis::skills::SkillSet;
use crate::errors::{AppError, EXTRACTION_FAILED_MESSAGE};
use crate::extraction::Upload;
use crate::resume::parser::ParsedResult;
use crate::scoring::ats::ScoreRecord;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub text: String,
    pub job_description: Option<String>,
}

#[derive(Deserialize)]
pub struct SkillsRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct SkillsResponse {
    pub skills: BTreeSet<String>,
    pub by_category: SkillSet,
}

/// POST /api/v1/resumes/parse
///
/// Multipart fields: `file` (required, filename carries the extension) and
/// `job_description` (optional). A non-blank job description re-scores the
/// parsed résumé against it.
pub async fn handle_parse(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedResult>, AppError> {
    let mut upload = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("The 'file' field must include a filename".into()))?;
                let data = field.bytes().await?;
                upload = Some(Upload { filename, data });
            }
            "job_description" => job_description = Some(field.text().await?),
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("Missing required multipart field 'file'".into()))?;
    let job_description = job_description.filter(|jd| !jd.trim().is_empty());

    let span = info_span!(
        "resume_upload",
        upload_id = %Uuid::new_v4(),
        filename = %upload.filename,
        bytes = upload.data.len(),
    );
    let parser = state.parser.clone();

    let parsed = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        let parsed = parser.parse(&upload)?;
        Ok::<_, AppError>(parsed.map(|parsed| match &job_description {
            Some(jd) => parser.rescore(parsed, jd),
            None => parsed,
        }))
    })
    .await
    .context("resume parsing task failed")??;

    parsed
        .map(Json)
        .ok_or_else(|| AppError::UnprocessableEntity(EXTRACTION_FAILED_MESSAGE.to_string()))
}

/// POST /api/v1/resumes/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreRecord>, AppError> {
    let parser = state.parser.clone();
    let record = tokio::task::spawn_blocking(move || {
        parser.score(&req.text, req.job_description.as_deref())
    })
    .await
    .context("scoring task failed")?;
    Ok(Json(record))
}

/// POST /api/v1/resumes/skills
pub async fn handle_skills(
    State(state): State<AppState>,
    Json(req): Json<SkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    let parser = state.parser.clone();
    let response = tokio::task::spawn_blocking(move || SkillsResponse {
        skills: parser.extract_skills(&req.text),
        by_category: parser.extract_skills_by_category(&req.text),
    })
    .await
    .context("skills extraction task failed")?;
    Ok(Json(response))
}
