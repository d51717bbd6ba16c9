//! Date-format consistency: flags every date format other than the primary one.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::consistency::variants::{primary, tally, VariantDef};
use crate::analysis::consistency::{CheckOutcome, ConsistencyIssue, PatternFinding, Severity};

pub const DATE_FORMAT_ISSUE: &str = "date_format_inconsistency";

/// Declaration order is the tie-break order for the primary format.
///
/// "May" is deliberately absent from the abbreviated list: "May 2020" is a
/// full month name and is counted there.
pub static DATE_FORMATS: [VariantDef; 5] = [
    VariantDef {
        name: "MM/YYYY",
        example: "01/2023",
        // Leading group keeps the tail of MM/DD/YYYY from counting as MM/YYYY.
        pattern: Lazy::new(|| {
            Regex::new(r"(?:^|[^/\d])(?:0?[1-9]|1[0-2])/\d{4}\b").expect("valid MM/YYYY pattern")
        }),
    },
    VariantDef {
        name: "YYYY-MM",
        example: "2023-01",
        pattern: Lazy::new(|| {
            Regex::new(r"\b\d{4}-(?:0[1-9]|1[0-2])\b").expect("valid YYYY-MM pattern")
        }),
    },
    VariantDef {
        name: "Month YYYY",
        example: "January 2023",
        pattern: Lazy::new(|| {
            Regex::new(
                r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
            )
            .expect("valid full month pattern")
        }),
    },
    VariantDef {
        name: "Mon YYYY",
        example: "Jan 2023",
        pattern: Lazy::new(|| {
            Regex::new(r"(?i)\b(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.?\s+\d{4}\b")
                .expect("valid abbreviated month pattern")
        }),
    },
    VariantDef {
        name: "MM/DD/YYYY",
        example: "01/15/2023",
        pattern: Lazy::new(|| {
            Regex::new(r"\b(?:0?[1-9]|1[0-2])/(?:0?[1-9]|[12]\d|3[01])/\d{4}\b")
                .expect("valid MM/DD/YYYY pattern")
        }),
    },
];

pub fn check_date_formats(text: &str) -> CheckOutcome {
    let formats = tally(&DATE_FORMATS, text);

    let mut issues = Vec::new();
    if formats.len() >= 2 {
        if let Some(main) = primary(&formats) {
            for other in formats.iter().filter(|f| f.name != main.name) {
                issues.push(ConsistencyIssue {
                    kind: DATE_FORMAT_ISSUE.to_string(),
                    severity: Severity::Medium,
                    location: "Throughout document".to_string(),
                    text: format!("{} (e.g. {})", other.name, other.example),
                    message: format!(
                        "Found {} date(s) in {} format but {} in {} format",
                        other.count, other.name, main.count, main.name
                    ),
                    suggestion: format!(
                        "Convert {} dates to {} format (e.g. {})",
                        other.name, main.name, main.example
                    ),
                    pattern: Some(main.name.clone()),
                });
            }
        }
    }

    CheckOutcome {
        issues,
        finding: PatternFinding::DateFormats(formats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(text: &str) -> Vec<(String, usize)> {
        tally(&DATE_FORMATS, text)
            .into_iter()
            .map(|c| (c.name, c.count))
            .collect()
    }

    #[test]
    fn test_each_format_is_recognised_in_isolation() {
        assert_eq!(counts("01/2023"), vec![("MM/YYYY".to_string(), 1)]);
        assert_eq!(counts("2023-01"), vec![("YYYY-MM".to_string(), 1)]);
        assert_eq!(counts("January 2023"), vec![("Month YYYY".to_string(), 1)]);
        assert_eq!(counts("Jan 2023"), vec![("Mon YYYY".to_string(), 1)]);
        assert_eq!(counts("Sept. 2023"), vec![("Mon YYYY".to_string(), 1)]);
        assert_eq!(counts("01/15/2023"), vec![("MM/DD/YYYY".to_string(), 1)]);
        assert_eq!(counts("May 2023"), vec![("Month YYYY".to_string(), 1)]);
    }

    #[test]
    fn test_ranges_count_both_ends() {
        assert_eq!(counts("01/2020 - 03/2021"), vec![("MM/YYYY".to_string(), 2)]);
        assert_eq!(
            counts("Jan 2020 – Mar 2021"),
            vec![("Mon YYYY".to_string(), 2)]
        );
    }

    #[test]
    fn test_single_format_has_no_issues() {
        let outcome = check_date_formats("01/2020 - 03/2021, 04/2021 - 05/2022");
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_minority_format_names_both_counts() {
        let outcome = check_date_formats("01/2020 - 03/2021\n04/2021 - 2022-05\n");
        assert_eq!(outcome.issues.len(), 1);
        let issue = &outcome.issues[0];
        assert_eq!(issue.kind, DATE_FORMAT_ISSUE);
        assert_eq!(issue.severity, Severity::Medium);
        assert!(issue.message.contains("1 date(s) in YYYY-MM"));
        assert!(issue.message.contains("3 in MM/YYYY"));
        assert_eq!(issue.pattern.as_deref(), Some("MM/YYYY"));
    }

    #[test]
    fn test_three_formats_tie_first_declared_wins() {
        let outcome = check_date_formats("01/2023 2023-01 January 2023");
        assert_eq!(outcome.issues.len(), 2);
        assert!(outcome
            .issues
            .iter()
            .all(|i| i.pattern.as_deref() == Some("MM/YYYY")));
    }
}
