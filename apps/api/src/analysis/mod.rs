// Resume analysis engine.
// Implements: text extraction, tenure, term matching, job-match scoring,
// consistency checking, and polish aggregation. Every function here is pure;
// the only I/O lives in handlers and the tone client.

pub mod consistency;
pub mod grading;
pub mod handlers;
pub mod job_match;
pub mod matcher;
pub mod recommendation;
pub mod report;
pub mod tenure;
pub mod text_extractor;

use thiserror::Error;

use crate::errors::AppError;

/// Input-validation failures raised by the analysis core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("resume contains no extractable text")]
    EmptyResume,

    #[error("resume text cannot be empty")]
    EmptyText,

    #[error("job requirements are required for match scoring")]
    MissingJobRequirements,
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Validation(err.to_string())
    }
}
