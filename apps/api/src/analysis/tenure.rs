//! Date & Tenure Analyzer — turns free-text date ranges into elapsed years.
//!
//! A malformed or missing start date is never an error: it contributes zero
//! years so one bad entry cannot abort a whole match calculation.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::resume::{ResumeDocument, SectionItem};

const DAYS_PER_YEAR: f64 = 365.25;

static REQUIRED_YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\+?\s*(?:years?|yrs?)\b").expect("valid years pattern"));

/// Explainable view of the experience sub-score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceAssessment {
    /// `None` when the requirement carries no numeric year count.
    pub required_years: Option<u32>,
    pub candidate_years: f64,
    /// Unrounded 0–100 sub-score.
    pub percentage: f64,
}

/// Elapsed years between `start` and `end`, measured against the current date.
///
/// `end` of `None`, empty, or "present" (any case) means today.
#[allow(dead_code)]
pub fn elapsed_years(start: &str, end: Option<&str>) -> f64 {
    elapsed_years_at(start, end, Utc::now().date_naive())
}

/// Same as [`elapsed_years`] with an explicit "today" for deterministic callers.
pub fn elapsed_years_at(start: &str, end: Option<&str>, today: NaiveDate) -> f64 {
    let Some(start) = parse_date(start) else {
        return 0.0;
    };

    let end = match end.map(str::trim) {
        None => today,
        Some(e) if e.is_empty() || e.eq_ignore_ascii_case("present") => today,
        Some(e) => match parse_date(e) {
            Some(d) => d,
            None => return 0.0,
        },
    };

    let days = (end - start).num_days() as f64;
    (days / DAYS_PER_YEAR).max(0.0)
}

/// Total tenure across every experience item, measured up to `today`.
///
/// Overlapping positions are summed, not merged.
pub fn total_tenure_years_at(resume: &ResumeDocument, today: NaiveDate) -> f64 {
    resume
        .experience_sections()
        .filter_map(|s| s.content.items.as_ref())
        .flatten()
        .map(|item| {
            let start = item_str(item, &["startDate", "start_date"]).unwrap_or("");
            let end = item_str(item, &["endDate", "end_date"]);
            elapsed_years_at(start, end, today)
        })
        .sum()
}

/// First `<n> years` / `<n> yrs` figure in a requirement string.
pub fn required_years(requirement: &str) -> Option<u32> {
    REQUIRED_YEARS
        .captures(requirement)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Scores candidate tenure against a free-text experience requirement.
///
/// No requirement, or one without a year count, is vacuously satisfied.
pub fn assess_experience(candidate_years: f64, requirement: Option<&str>) -> ExperienceAssessment {
    let required = requirement.and_then(required_years);

    let percentage = match required {
        None | Some(0) => 100.0,
        Some(years) => (candidate_years / years as f64 * 100.0).min(100.0),
    };

    ExperienceAssessment {
        required_years: required,
        candidate_years,
        percentage,
    }
}

fn item_str<'a>(item: &'a SectionItem, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| item.get(*k))
        .and_then(Value::as_str)
}

/// Parses the date shapes resume editors commonly emit. Month-precision
/// dates resolve to the first of the month; a bare year to January 1st.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    let full_formats = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    if let Some(d) = full_formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    {
        return Some(d);
    }

    // Month precision: pad with a day and reuse the full-date parsers.
    let month_candidates = [
        (format!("{s}-01"), "%Y-%m-%d"),
        (format!("{s}/01"), "%Y/%m/%d"),
        (format!("01/{s}"), "%d/%m/%Y"),
    ];
    if let Some(d) = month_candidates
        .iter()
        .find_map(|(padded, f)| NaiveDate::parse_from_str(padded, f).ok())
    {
        return Some(d);
    }

    // "January 2020", "Jan 2020", "Jan. 2020", "Sept 2020"
    let named = s.replace('.', "");
    let named = named
        .split_whitespace()
        .map(|w| if w.eq_ignore_ascii_case("sept") { "Sep" } else { w })
        .collect::<Vec<_>>()
        .join(" ");
    if let Ok(d) = NaiveDate::parse_from_str(&format!("1 {named}"), "%d %B %Y") {
        return Some(d);
    }

    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }

    None
}
