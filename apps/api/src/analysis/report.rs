//! Report Aggregator — composes whichever analyses ran into one polish score.
//!
//! Best effort: an absent sub-analysis contributes neither score nor weight,
//! and the remaining weights are NOT renormalized. `applied_weight` records
//! how much of the configured total actually contributed.

use serde::{Deserialize, Serialize};

use crate::analysis::consistency::ConsistencyReport;
use crate::analysis::grading::{grade_for_score, Grade};
use crate::analysis::job_match::MatchResult;
use crate::tone_client::ToneResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolishWeights {
    pub consistency: f64,
    pub tone: f64,
    pub job_match: f64,
}

impl Default for PolishWeights {
    fn default() -> Self {
        Self {
            consistency: 0.4,
            tone: 0.3,
            job_match: 0.3,
        }
    }
}

/// Already-resolved upstream results, any of which may be missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportInputs<'a> {
    pub match_result: Option<&'a MatchResult>,
    pub consistency: Option<&'a ConsistencyReport>,
    pub tone: Option<&'a ToneResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolishComponent {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolishReport {
    pub polish_score: u32,
    pub grade: Grade,
    pub components: Vec<PolishComponent>,
    pub applied_weight: f64,
}

pub fn aggregate(inputs: ReportInputs<'_>, weights: &PolishWeights) -> PolishReport {
    let candidates = [
        (
            "consistency",
            inputs.consistency.map(|c| c.scores.overall as f64),
            weights.consistency,
        ),
        (
            "tone",
            inputs.tone.map(|t| t.scores.overall.clamp(0.0, 100.0)),
            weights.tone,
        ),
        (
            "jobMatch",
            inputs.match_result.map(|m| m.overall_score as f64),
            weights.job_match,
        ),
    ];

    let components: Vec<PolishComponent> = candidates
        .into_iter()
        .filter_map(|(name, score, weight)| {
            score.map(|score| PolishComponent {
                name: name.to_string(),
                score,
                weight,
                contribution: score * weight,
            })
        })
        .collect();

    let total: f64 = components.iter().map(|c| c.contribution).sum();
    let applied_weight = components.iter().map(|c| c.weight).sum();
    let polish_score = total.round().clamp(0.0, 100.0) as u32;

    PolishReport {
        polish_score,
        grade: grade_for_score(polish_score),
        components,
        applied_weight,
    }
}
