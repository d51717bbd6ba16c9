//! Bullet-style consistency: one marker style should be used for every list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::consistency::variants::{primary, tally, VariantDef};
use crate::analysis::consistency::{CheckOutcome, ConsistencyIssue, PatternFinding, Severity};

pub const BULLET_STYLE_ISSUE: &str = "bullet_style_inconsistency";

/// Markers anchored at the very start of a line and followed by whitespace.
pub static BULLET_STYLES: [VariantDef; 4] = [
    VariantDef {
        name: "dash (-)",
        example: "- Built the API",
        pattern: Lazy::new(|| Regex::new(r"(?m)^-[ \t]+").expect("valid dash pattern")),
    },
    VariantDef {
        name: "asterisk (*)",
        example: "* Built the API",
        pattern: Lazy::new(|| Regex::new(r"(?m)^\*[ \t]+").expect("valid asterisk pattern")),
    },
    VariantDef {
        name: "bullet (•)",
        example: "• Built the API",
        pattern: Lazy::new(|| Regex::new(r"(?m)^•[ \t]+").expect("valid bullet pattern")),
    },
    VariantDef {
        name: "numbered (1.)",
        example: "1. Built the API",
        pattern: Lazy::new(|| Regex::new(r"(?m)^\d+\.[ \t]+").expect("valid numbered pattern")),
    },
];

pub fn check_bullet_styles(text: &str) -> CheckOutcome {
    let styles = tally(&BULLET_STYLES, text);

    let mut issues = Vec::new();
    if styles.len() >= 2 {
        if let Some(main) = primary(&styles) {
            for other in styles.iter().filter(|s| s.name != main.name) {
                issues.push(ConsistencyIssue {
                    kind: BULLET_STYLE_ISSUE.to_string(),
                    severity: Severity::Low,
                    location: "Bullet points".to_string(),
                    text: other.example.to_string(),
                    message: format!(
                        "Found {} {} bullet(s) but {} {} bullet(s)",
                        other.count, other.name, main.count, main.name
                    ),
                    suggestion: format!("Replace {} bullets with {} bullets", other.name, main.name),
                    pattern: Some(main.name.clone()),
                });
            }
        }
    }

    CheckOutcome {
        issues,
        finding: PatternFinding::BulletStyles(styles),
    }
}
