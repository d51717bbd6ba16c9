//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::consistency::{self, ConsistencyReport};
use crate::analysis::job_match::{score_match, MatchResult};
use crate::analysis::report::{aggregate, PolishReport, ReportInputs};
use crate::analysis::text_extractor::extract_text;
use crate::analysis::AnalysisError;
use crate::errors::AppError;
use crate::models::job::JobRequirements;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;
use crate::tone_client::ToneResult;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume: ResumeDocument,
    #[serde(default)]
    pub job: Option<JobRequirements>,
}

#[derive(Debug, Deserialize)]
pub struct ConsistencyRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub resume: Option<ResumeDocument>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job: Option<JobRequirements>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_result: Option<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<ConsistencyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<ToneResult>,
    pub polish: PolishReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis/match
///
/// Scores a structured resume against job requirements.
pub async fn handle_match(
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let job = request.job.ok_or(AnalysisError::MissingJobRequirements)?;
    let result = score_match(&request.resume, &job)?;

    debug!(
        "Match scored {} ({}), {} recommendation(s)",
        result.overall_score,
        result.grade,
        result.recommendations.len()
    );

    Ok(Json(result))
}

/// POST /api/v1/analysis/consistency
///
/// Runs the consistency sub-checks over plain resume text.
pub async fn handle_consistency(
    Json(request): Json<ConsistencyRequest>,
) -> Result<Json<ConsistencyReport>, AppError> {
    let report = run_consistency(request.text).await?;
    Ok(Json(report))
}

/// POST /api/v1/analysis/consistency/upload
///
/// Accepts a multipart `file` field (PDF or any text/* type), extracts its
/// text and runs the consistency sub-checks on it.
pub async fn handle_consistency_upload(
    mut multipart: Multipart,
) -> Result<Json<ConsistencyReport>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let kind = UploadKind::detect(field.content_type(), field.file_name())?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::UnprocessableEntity(format!("Failed to read upload: {e}")))?;

        info!("Received {kind:?} upload ({} bytes)", data.len());

        let text = decode_upload(kind, data).await?;
        if text.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(
                "Uploaded file contains no extractable text".to_string(),
            ));
        }

        let report = run_consistency(text).await?;
        return Ok(Json(report));
    }

    Err(AppError::Validation(format!(
        "multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// POST /api/v1/analysis/report
///
/// Best-effort composition: runs every analysis the inputs allow, calls the
/// tone collaborator when one is configured, and aggregates a polish score.
pub async fn handle_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let match_result = match (&request.resume, &request.job) {
        (Some(resume), Some(job)) => Some(score_match(resume, job)?),
        _ => None,
    };

    let text = request
        .resume_text
        .filter(|t| !t.trim().is_empty())
        .or_else(|| request.resume.as_ref().map(extract_text))
        .filter(|t| !t.trim().is_empty());

    if match_result.is_none() && text.is_none() {
        return Err(AppError::Validation(
            "report needs a resume with job requirements, or resume text".to_string(),
        ));
    }

    let (consistency, tone) = match text {
        Some(text) => {
            let (consistency, tone) =
                tokio::join!(run_consistency(text.clone()), run_tone(&state, &text));
            (Some(consistency?), tone)
        }
        None => (None, None),
    };

    let polish = aggregate(
        ReportInputs {
            match_result: match_result.as_ref(),
            consistency: consistency.as_ref(),
            tone: tone.as_ref(),
        },
        &state.config.polish_weights,
    );

    info!(
        "Polish report: {} ({}), applied weight {:.2}",
        polish.polish_score, polish.grade, polish.applied_weight
    );

    Ok(Json(ReportResponse {
        match_result,
        consistency,
        tone,
        polish,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn run_consistency(text: String) -> Result<ConsistencyReport, AnalysisError> {
    let report = consistency::check_concurrent(text).await?;
    debug!(
        "Consistency scored {} ({}), {} issue(s)",
        report.scores.overall,
        report.grade,
        report.issues.len()
    );
    Ok(report)
}

/// Calls the optional tone collaborator under the configured deadline.
/// Any failure is logged and the tone result omitted.
async fn run_tone(state: &AppState, text: &str) -> Option<ToneResult> {
    let analyzer = state.tone_analyzer.as_ref()?;

    match tokio::time::timeout(state.config.analysis_timeout, analyzer.analyze(text)).await {
        Ok(Ok(result)) => Some(result),
        Ok(Err(e)) => {
            warn!("Tone analysis failed, omitting from report: {e}");
            None
        }
        Err(_) => {
            warn!(
                "Tone analysis timed out after {:?}, omitting from report",
                state.config.analysis_timeout
            );
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    Pdf,
    Text,
}

impl UploadKind {
    /// Content type decides; the file extension is the fallback when the
    /// client sends none or a generic octet-stream.
    fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Result<Self, AppError> {
        let content_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| ct != "application/octet-stream");

        match content_type.as_deref() {
            Some("application/pdf") => return Ok(UploadKind::Pdf),
            Some(ct) if ct.starts_with("text/") => return Ok(UploadKind::Text),
            Some(ct) => {
                return Err(AppError::UnprocessableEntity(format!(
                    "Unsupported file type '{ct}': upload a PDF or a text file"
                )))
            }
            None => {}
        }

        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(UploadKind::Pdf),
            Some("txt" | "md" | "text") => Ok(UploadKind::Text),
            _ => Err(AppError::UnprocessableEntity(
                "Unsupported file type: upload a PDF or a text file".to_string(),
            )),
        }
    }
}

async fn decode_upload(kind: UploadKind, data: Bytes) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Uploaded file is empty".to_string(),
        ));
    }

    match kind {
        UploadKind::Text => String::from_utf8(data.to_vec()).map_err(|_| {
            AppError::UnprocessableEntity("Text upload is not valid UTF-8".to_string())
        }),
        // PDF parsing is CPU-bound; keep it off the async executor.
        UploadKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data)
        })
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::UnprocessableEntity("PDF could not be parsed".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!(
                    "spawn_blocking failed in PDF extraction: {e}"
                ))
            }
        })?
        .map_err(|e| {
            AppError::UnprocessableEntity(format!("Failed to extract text from PDF: {e}"))
        }),
    }
}
