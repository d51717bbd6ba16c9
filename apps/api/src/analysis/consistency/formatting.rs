//! Header capitalization and indentation consistency.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::consistency::tense::is_section_header;
use crate::analysis::consistency::{
    CheckOutcome, ConsistencyIssue, HeaderPattern, PatternFinding, Severity,
};

pub const HEADER_CASE_ISSUE: &str = "header_capitalization_inconsistency";
pub const INDENTATION_ISSUE: &str = "indentation_inconsistency";

const MAX_HEADER_LEN: usize = 50;
const MAX_HEADER_WORDS: usize = 4;
/// Distinct indent widths tolerated before flagging.
const MAX_INDENT_WIDTHS: usize = 3;

/// Letters and spaces only, starting with a capital, at least four characters.
static HEADER_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z ]{3,}$").expect("valid header candidate pattern"));

pub fn check_formatting(text: &str) -> CheckOutcome {
    let mut issues = Vec::new();

    let headers = detect_headers(text);
    let (all_caps, title_case): (Vec<&str>, Vec<&str>) =
        headers.iter().partition(|h| is_all_caps(h));

    if headers.len() > 1 && !all_caps.is_empty() && !title_case.is_empty() {
        let (majority, suggestion) = if all_caps.len() >= title_case.len() {
            ("ALL CAPS", "Use ALL CAPS for every section header")
        } else {
            ("Title Case", "Use Title Case for every section header")
        };
        issues.push(ConsistencyIssue {
            kind: HEADER_CASE_ISSUE.to_string(),
            severity: Severity::Medium,
            location: "Section headers".to_string(),
            text: headers.join(" | "),
            message: format!(
                "{} header(s) are ALL CAPS and {} are Title Case",
                all_caps.len(),
                title_case.len()
            ),
            suggestion: suggestion.to_string(),
            pattern: Some(majority.to_string()),
        });
    }

    let widths = indentation_widths(text);
    if widths.len() > MAX_INDENT_WIDTHS {
        let listed = widths
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(ConsistencyIssue {
            kind: INDENTATION_ISSUE.to_string(),
            severity: Severity::Low,
            location: "Throughout document".to_string(),
            text: format!("indent widths: {listed}"),
            message: format!("Found {} different indentation levels", widths.len()),
            suggestion: "Use one or two consistent indentation levels".to_string(),
            pattern: None,
        });
    }

    CheckOutcome {
        issues,
        finding: PatternFinding::Formatting {
            headers: HeaderPattern {
                all_caps: all_caps.len(),
                title_case: title_case.len(),
            },
            indentation_widths: widths,
        },
    }
}

/// Short lines written entirely in capitals or in Title Case.
///
/// Lines above the first ALL-CAPS or markdown section header are the contact
/// block (name, title) and are not counted. Without such a header every line
/// is considered.
fn detect_headers(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let first_section = lines
        .iter()
        .position(|line| is_section_header(line))
        .unwrap_or(0);

    lines[first_section..]
        .iter()
        .map(|&line| line.trim())
        .filter(|line| line.len() < MAX_HEADER_LEN && HEADER_CANDIDATE.is_match(line))
        .filter(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            words.len() <= MAX_HEADER_WORDS
                && (is_all_caps(line)
                    || words
                        .iter()
                        .all(|w| w.chars().next().is_some_and(char::is_uppercase)))
        })
        .collect()
}

fn is_all_caps(line: &str) -> bool {
    !line.chars().any(char::is_lowercase)
}

/// Distinct leading-space counts over non-blank, space-indented lines.
fn indentation_widths(text: &str) -> Vec<usize> {
    text.lines()
        .filter(|line| line.starts_with(' ') && !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_of(outcome: &CheckOutcome) -> HeaderPattern {
        match &outcome.finding {
            PatternFinding::Formatting { headers, .. } => headers.clone(),
            other => panic!("unexpected finding {other:?}"),
        }
    }

    #[test]
    fn test_mixed_header_case_is_flagged() {
        let text = "EXPERIENCE\n- did things\nEDUCATION\n- studied\nSkills And Tools\nrust\n";
        let outcome = check_formatting(text);
        assert_eq!(
            headers_of(&outcome),
            HeaderPattern {
                all_caps: 2,
                title_case: 1
            }
        );
        assert_eq!(outcome.issues.len(), 1);
        let issue = &outcome.issues[0];
        assert_eq!(issue.kind, HEADER_CASE_ISSUE);
        assert_eq!(issue.severity, Severity::Medium);
        assert_eq!(issue.pattern.as_deref(), Some("ALL CAPS"));
    }

    #[test]
    fn test_uniform_headers_are_fine() {
        let outcome = check_formatting("EXPERIENCE\nstuff\nEDUCATION\nmore stuff\n");
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_sentences_are_not_headers() {
        let outcome = check_formatting("EXPERIENCE\nLed the team to success\nBuilt things.\n");
        assert_eq!(
            headers_of(&outcome),
            HeaderPattern {
                all_caps: 1,
                title_case: 0
            }
        );
    }

    #[test]
    fn test_name_line_above_caps_headers_is_ignored() {
        let text = "Jane Doe\njane@example.com\nEXPERIENCE\n- Led things\nEDUCATION\n- BS\n";
        let outcome = check_formatting(text);
        assert!(outcome.issues.is_empty(), "issues: {:?}", outcome.issues);
        assert_eq!(
            headers_of(&outcome),
            HeaderPattern {
                all_caps: 2,
                title_case: 0
            }
        );
    }

    #[test]
    fn test_title_case_resume_keeps_every_header() {
        let text = "Jane Doe\nExperience\n- Led things\nEducation\n- BS\n";
        let outcome = check_formatting(text);
        assert!(outcome.issues.is_empty());
        assert_eq!(headers_of(&outcome).title_case, 3);
    }

    #[test]
    fn test_indentation_widths() {
        let text = "a\n  b\n    c\n  d\n      e\n\n        \n";
        assert_eq!(indentation_widths(text), vec![2, 4, 6]);
        assert!(check_formatting(text).issues.is_empty());

        let deeper = format!("{text}        f\n");
        let outcome = check_formatting(&deeper);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].kind, INDENTATION_ISSUE);
    }
}
