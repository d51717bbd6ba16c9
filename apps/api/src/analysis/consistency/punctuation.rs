//! Bullet punctuation and spacing.
//!
//! Bullets either end in `.`/`!`/`?` or they do not; the majority wins and
//! the minority is flagged only when it exceeds 20% of bullet lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::consistency::{
    BulletEnding, CheckOutcome, ConsistencyIssue, PatternFinding, PunctuationPattern, Severity,
};

pub const PUNCTUATION_ISSUE: &str = "punctuation_inconsistency";
pub const SPACING_ISSUE: &str = "spacing_excessive";

/// Minority share of bullet lines that must be exceeded (strictly) to flag.
const MINORITY_THRESHOLD: f64 = 0.2;
/// Runs of 2+ spaces tolerated before flagging.
const MAX_DOUBLE_SPACES: usize = 3;

static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-•*]\s+\S").expect("valid bullet line pattern"));
static DOUBLE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid spacing pattern"));

pub fn check_punctuation(text: &str) -> CheckOutcome {
    let mut issues = Vec::new();
    let pattern = bullet_endings(text);

    if let Some(p) = &pattern {
        let total = p.with_period + p.without_period;
        let minority = p.with_period.min(p.without_period);
        if minority > 0 && minority as f64 / total as f64 > MINORITY_THRESHOLD {
            issues.push(punctuation_issue(p, minority, total));
        }
    }

    let double_spaces = DOUBLE_SPACE.find_iter(text).count();
    if double_spaces > MAX_DOUBLE_SPACES {
        issues.push(ConsistencyIssue {
            kind: SPACING_ISSUE.to_string(),
            severity: Severity::Low,
            location: "Throughout document".to_string(),
            text: format!("{double_spaces} runs of multiple spaces"),
            message: format!("Found {double_spaces} places with two or more consecutive spaces"),
            suggestion: "Use a single space between words and sentences".to_string(),
            pattern: None,
        });
    }

    CheckOutcome {
        issues,
        finding: PatternFinding::Punctuation(pattern),
    }
}

/// Classifies every bullet line by its ending. `None` when there are no bullets.
fn bullet_endings(text: &str) -> Option<PunctuationPattern> {
    let (with_period, without_period) = text
        .lines()
        .map(str::trim)
        .filter(|line| BULLET_LINE.is_match(line))
        .fold((0usize, 0usize), |(with, without), line| {
            if line.ends_with(['.', '!', '?']) {
                (with + 1, without)
            } else {
                (with, without + 1)
            }
        });

    if with_period + without_period == 0 {
        return None;
    }

    // Ties keep periods.
    let majority = if with_period >= without_period {
        BulletEnding::WithPeriod
    } else {
        BulletEnding::WithoutPeriod
    };

    Some(PunctuationPattern {
        with_period,
        without_period,
        majority,
    })
}

fn punctuation_issue(p: &PunctuationPattern, minority: usize, total: usize) -> ConsistencyIssue {
    let (message, suggestion) = match p.majority {
        BulletEnding::WithPeriod => (
            format!("{minority} of {total} bullet points are missing ending punctuation"),
            "Add a period to the end of every bullet point",
        ),
        BulletEnding::WithoutPeriod => (
            format!("{minority} of {total} bullet points end with punctuation while the rest do not"),
            "Remove the ending punctuation from those bullet points",
        ),
    };

    ConsistencyIssue {
        kind: PUNCTUATION_ISSUE.to_string(),
        severity: Severity::Low,
        location: "Bullet points".to_string(),
        text: format!(
            "{} with period, {} without",
            p.with_period, p.without_period
        ),
        message,
        suggestion: suggestion.to_string(),
        pattern: Some(p.majority.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullets(with: usize, without: usize) -> String {
        let mut text = String::new();
        for i in 0..with {
            text.push_str(&format!("- Shipped feature {i}.\n"));
        }
        for i in 0..without {
            text.push_str(&format!("- Shipped feature {i}\n"));
        }
        text
    }

    fn punctuation_issues(outcome: &CheckOutcome) -> Vec<&ConsistencyIssue> {
        outcome
            .issues
            .iter()
            .filter(|i| i.kind == PUNCTUATION_ISSUE)
            .collect()
    }

    #[test]
    fn test_exactly_twenty_percent_does_not_trigger() {
        let outcome = check_punctuation(&bullets(8, 2));
        assert!(punctuation_issues(&outcome).is_empty());
        match outcome.finding {
            PatternFinding::Punctuation(Some(p)) => {
                assert_eq!(p.majority, BulletEnding::WithPeriod);
                assert_eq!((p.with_period, p.without_period), (8, 2));
            }
            other => panic!("unexpected finding {other:?}"),
        }
    }

    #[test]
    fn test_above_twenty_percent_triggers_with_majority_pattern() {
        let outcome = check_punctuation(&bullets(7, 3));
        let issues = punctuation_issues(&outcome);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pattern.as_deref(), Some("with-period"));
        assert_eq!(issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_without_period_majority() {
        let outcome = check_punctuation(&bullets(1, 3));
        let issues = punctuation_issues(&outcome);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pattern.as_deref(), Some("without-period"));
    }

    #[test]
    fn test_uniform_endings_no_issue() {
        assert!(check_punctuation(&bullets(0, 5)).issues.is_empty());
        assert!(check_punctuation(&bullets(5, 0)).issues.is_empty());
    }

    #[test]
    fn test_indented_and_mixed_markers_are_bullets() {
        let text = "  - Led team.\n• Built system\n* Deployed service\n";
        match check_punctuation(text).finding {
            PatternFinding::Punctuation(Some(p)) => {
                assert_eq!((p.with_period, p.without_period), (1, 2));
                assert_eq!(p.majority, BulletEnding::WithoutPeriod);
            }
            other => panic!("unexpected finding {other:?}"),
        }
    }

    #[test]
    fn test_no_bullets_no_pattern() {
        let outcome = check_punctuation("Plain prose only.\nAnother line");
        assert_eq!(outcome.finding, PatternFinding::Punctuation(None));
    }

    #[test]
    fn test_excessive_spacing() {
        let three = "a  b  c  d";
        assert!(check_punctuation(three).issues.is_empty());

        let four = "a  b  c  d   e";
        let outcome = check_punctuation(four);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].kind, SPACING_ISSUE);
    }
}
