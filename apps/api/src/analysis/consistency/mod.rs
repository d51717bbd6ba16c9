//! Consistency Checker — scans raw resume text for writing-consistency issues.
//!
//! # Architecture
//! Five independent sub-checks (tense, date formats, bullet styles, bullet
//! punctuation, formatting) read the same immutable text and share no state.
//! `check` runs them in sequence; `check_concurrent` fans them out onto
//! blocking tasks and joins them. Both produce identical reports.
//!
//! A sub-check that fails (a panic, or a join error in `check_concurrent`)
//! is logged and contributes nothing; the remaining checks still score.

pub mod bullets;
pub mod dates;
pub mod formatting;
pub mod punctuation;
pub mod scoring;
pub mod tense;
pub mod variants;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::analysis::grading::{grade_for_score, Grade};
use crate::analysis::recommendation::{Priority, Recommendation, RecommendationKind};
use crate::analysis::AnalysisError;

pub use scoring::{compute_scores, ConsistencyScores};
pub use variants::VariantCount;

// ────────────────────────────────────────────────────────────────────────────
// Issue model
// ────────────────────────────────────────────────────────────────────────────

/// Severity tier of an issue. Tiers this service does not know (for
/// example from an external analyzer) deserialize as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

/// A single consistency finding. `kind` is `<dimension>_<subtype>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyIssue {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub location: String,
    pub text: String,
    pub message: String,
    pub suggestion: String,
    /// Majority pattern the issue was measured against, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Detected patterns
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletEnding {
    #[serde(rename = "with-period")]
    WithPeriod,
    #[serde(rename = "without-period")]
    WithoutPeriod,
}

impl BulletEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            BulletEnding::WithPeriod => "with-period",
            BulletEnding::WithoutPeriod => "without-period",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunctuationPattern {
    pub with_period: usize,
    pub without_period: usize,
    pub majority: BulletEnding,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderPattern {
    pub all_caps: usize,
    pub title_case: usize,
}

/// Every variant the sub-checks observed, for rendering and recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPatterns {
    pub date_formats: Vec<VariantCount>,
    pub bullet_styles: Vec<VariantCount>,
    pub punctuation: Option<PunctuationPattern>,
    pub headers: HeaderPattern,
    pub indentation_widths: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub issues: Vec<ConsistencyIssue>,
    pub scores: ConsistencyScores,
    pub patterns: DetectedPatterns,
    pub recommendations: Vec<Recommendation>,
    pub grade: Grade,
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-checks
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of independent consistency checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubCheck {
    Tense,
    DateFormat,
    BulletStyle,
    BulletPunctuation,
    Formatting,
}

impl SubCheck {
    pub const ALL: [SubCheck; 5] = [
        SubCheck::Tense,
        SubCheck::DateFormat,
        SubCheck::BulletStyle,
        SubCheck::BulletPunctuation,
        SubCheck::Formatting,
    ];

    pub fn run(self, text: &str) -> CheckOutcome {
        match self {
            SubCheck::Tense => tense::check_tense(text),
            SubCheck::DateFormat => dates::check_date_formats(text),
            SubCheck::BulletStyle => bullets::check_bullet_styles(text),
            SubCheck::BulletPunctuation => punctuation::check_punctuation(text),
            SubCheck::Formatting => formatting::check_formatting(text),
        }
    }
}

/// What a sub-check learned about the document besides its issues.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternFinding {
    None,
    DateFormats(Vec<VariantCount>),
    BulletStyles(Vec<VariantCount>),
    Punctuation(Option<PunctuationPattern>),
    Formatting {
        headers: HeaderPattern,
        indentation_widths: Vec<usize>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub issues: Vec<ConsistencyIssue>,
    pub finding: PatternFinding,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Runs every sub-check in order on the calling thread. A sub-check that
/// panics is logged and skipped like in `check_concurrent`.
#[allow(dead_code)]
pub fn check(text: &str) -> Result<ConsistencyReport, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyText);
    }
    let outcomes = SubCheck::ALL
        .iter()
        .filter_map(|&c| run_guarded(c, || c.run(text)))
        .collect();
    Ok(assemble(outcomes))
}

/// Runs every sub-check on its own blocking task and joins the results.
pub async fn check_concurrent(text: String) -> Result<ConsistencyReport, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyText);
    }
    let text: Arc<str> = Arc::from(text);

    // Spawn everything first so the checks overlap, then join in check order.
    let handles: Vec<_> = SubCheck::ALL
        .iter()
        .map(|&sub_check| {
            let text = Arc::clone(&text);
            (
                sub_check,
                tokio::task::spawn_blocking(move || sub_check.run(&text)),
            )
        })
        .collect();

    Ok(assemble(join_outcomes(handles).await))
}

/// Awaits each handle in order. Failed tasks are logged and dropped.
async fn join_outcomes(
    handles: Vec<(SubCheck, JoinHandle<CheckOutcome>)>,
) -> Vec<CheckOutcome> {
    let mut outcomes = Vec::with_capacity(handles.len());
    for (sub_check, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!("consistency sub-check {sub_check:?} failed, skipping: {e}"),
        }
    }
    outcomes
}

fn run_guarded<F>(sub_check: SubCheck, run: F) -> Option<CheckOutcome>
where
    F: FnOnce() -> CheckOutcome,
{
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(outcome) => Some(outcome),
        Err(_) => {
            warn!("consistency sub-check {sub_check:?} panicked, skipping");
            None
        }
    }
}

/// Folds sub-check outcomes into a report: issues in check order, scores,
/// patterns and pattern-driven recommendations.
fn assemble(outcomes: Vec<CheckOutcome>) -> ConsistencyReport {
    let mut issues = Vec::new();
    let mut patterns = DetectedPatterns::default();

    for outcome in outcomes {
        issues.extend(outcome.issues);
        match outcome.finding {
            PatternFinding::None => {}
            PatternFinding::DateFormats(formats) => patterns.date_formats = formats,
            PatternFinding::BulletStyles(styles) => patterns.bullet_styles = styles,
            PatternFinding::Punctuation(p) => patterns.punctuation = p,
            PatternFinding::Formatting {
                headers,
                indentation_widths,
            } => {
                patterns.headers = headers;
                patterns.indentation_widths = indentation_widths;
            }
        }
    }

    let scores = compute_scores(&issues);
    let recommendations = build_recommendations(&patterns, &issues);

    debug!(
        issues = issues.len(),
        overall = scores.overall,
        "consistency check complete"
    );

    ConsistencyReport {
        grade: grade_for_score(scores.overall),
        issues,
        scores,
        patterns,
        recommendations,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendations
// ────────────────────────────────────────────────────────────────────────────

/// Derived from the detected patterns; only the tense recommendation looks
/// at the issue list.
fn build_recommendations(
    patterns: &DetectedPatterns,
    issues: &[ConsistencyIssue],
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if patterns.date_formats.len() > 1 {
        if let Some(primary) = variants::primary(&patterns.date_formats) {
            recs.push(
                Recommendation::new(
                    Priority::Medium,
                    RecommendationKind::DateFormat,
                    format!(
                        "Your resume uses {} different date formats",
                        patterns.date_formats.len()
                    ),
                    format!(
                        "Use the {} format (e.g. {}) for every date",
                        primary.name, primary.example
                    ),
                    "Consistent dates read as careful work and parse reliably in applicant tracking systems",
                )
                .with_title("Standardize date formats"),
            );
        }
    }

    if patterns.bullet_styles.len() > 1 {
        if let Some(primary) = variants::primary(&patterns.bullet_styles) {
            recs.push(
                Recommendation::new(
                    Priority::Low,
                    RecommendationKind::BulletStyle,
                    format!(
                        "Your resume mixes {} bullet styles",
                        patterns.bullet_styles.len()
                    ),
                    format!("Use {} bullets throughout", primary.name),
                    "Uniform bullets make the document easier to scan",
                )
                .with_title("Use one bullet style"),
            );
        }
    }

    if let Some(p) = &patterns.punctuation {
        recs.push(punctuation_recommendation(p));
    }

    if issues.iter().any(|i| i.kind.starts_with("tense")) {
        recs.push(
            Recommendation::new(
                Priority::High,
                RecommendationKind::Tense,
                "Some sections mix past and present tense",
                "Use present tense for your current role and past tense for previous roles",
                "Tense shifts are among the most noticeable writing errors to recruiters",
            )
            .with_title("Fix verb tense"),
        );
    }

    recs
}

/// Keyed off the majority ending, whether or not the bullets are mixed.
fn punctuation_recommendation(p: &PunctuationPattern) -> Recommendation {
    let action = match p.majority {
        BulletEnding::WithPeriod => "End every bullet point with a period",
        BulletEnding::WithoutPeriod => "Remove ending punctuation from every bullet point",
    };

    let (description, title) = if p.with_period > 0 && p.without_period > 0 {
        (
            format!(
                "{} bullet(s) end with punctuation and {} do not",
                p.with_period, p.without_period
            ),
            "Make bullet punctuation consistent",
        )
    } else {
        (
            format!(
                "All {} bullet(s) follow the {} pattern",
                p.with_period + p.without_period,
                p.majority.as_str()
            ),
            "Keep bullet punctuation consistent",
        )
    };

    Recommendation::new(
        Priority::Low,
        RecommendationKind::Punctuation,
        description,
        action,
        "Consistent punctuation gives bullets a polished rhythm",
    )
    .with_title(title)
}
