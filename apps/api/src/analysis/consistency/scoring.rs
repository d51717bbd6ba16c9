//! Severity-weighted dimension scores and the fixed overall blend.

use serde::{Deserialize, Serialize};

use crate::analysis::consistency::{ConsistencyIssue, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyScores {
    pub tense: u32,
    pub dates: u32,
    pub formatting: u32,
    pub punctuation: u32,
    pub overall: u32,
}

/// Score bucket an issue deducts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Tense,
    Dates,
    Formatting,
    Punctuation,
}

const TENSE_WEIGHT: f64 = 0.35;
const DATES_WEIGHT: f64 = 0.25;
const FORMATTING_WEIGHT: f64 = 0.25;
const PUNCTUATION_WEIGHT: f64 = 0.15;

const PERFECT: i64 = 100;

/// Points deducted per issue.
pub fn severity_weight(severity: Severity) -> i64 {
    match severity {
        Severity::High => 10,
        Severity::Medium => 5,
        Severity::Low => 2,
        Severity::Unknown => 3,
    }
}

/// Routes an issue type to its dimension. Unrecognised types land in
/// formatting so they still count against the score.
pub fn dimension_for(kind: &str) -> Dimension {
    if kind.starts_with("tense") {
        Dimension::Tense
    } else if kind.contains("date") {
        Dimension::Dates
    } else if kind.contains("punctuation") || kind.contains("spacing") {
        Dimension::Punctuation
    } else {
        Dimension::Formatting
    }
}

pub fn compute_scores(issues: &[ConsistencyIssue]) -> ConsistencyScores {
    let mut tense = PERFECT;
    let mut dates = PERFECT;
    let mut formatting = PERFECT;
    let mut punctuation = PERFECT;

    for issue in issues {
        let penalty = severity_weight(issue.severity);
        match dimension_for(&issue.kind) {
            Dimension::Tense => tense -= penalty,
            Dimension::Dates => dates -= penalty,
            Dimension::Formatting => formatting -= penalty,
            Dimension::Punctuation => punctuation -= penalty,
        }
    }

    let clamp = |score: i64| score.clamp(0, PERFECT) as u32;
    let (tense, dates, formatting, punctuation) =
        (clamp(tense), clamp(dates), clamp(formatting), clamp(punctuation));

    ConsistencyScores {
        tense,
        dates,
        formatting,
        punctuation,
        overall: blend(tense, dates, formatting, punctuation),
    }
}

fn blend(tense: u32, dates: u32, formatting: u32, punctuation: u32) -> u32 {
    (tense as f64 * TENSE_WEIGHT
        + dates as f64 * DATES_WEIGHT
        + formatting as f64 * FORMATTING_WEIGHT
        + punctuation as f64 * PUNCTUATION_WEIGHT)
        .round() as u32
}
