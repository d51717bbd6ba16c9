//! Verb-tense consistency within each resume section.
//!
//! Sections are found with a header heuristic; inside each, fixed past- and
//! present-tense verb lists are counted. A section is flagged when both
//! tenses appear and neither clearly dominates.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::consistency::{CheckOutcome, ConsistencyIssue, PatternFinding, Severity};

pub const TENSE_ISSUE: &str = "tense_inconsistency";

const MAX_HEADER_LEN: usize = 50;
/// Past-tense share must fall strictly inside this band to flag.
const MIXED_LOWER: f64 = 0.2;
const MIXED_UPPER: f64 = 0.8;

const PAST_TENSE_VERBS: &[&str] = &[
    "achieved",
    "analyzed",
    "built",
    "collaborated",
    "coordinated",
    "created",
    "delivered",
    "designed",
    "developed",
    "established",
    "implemented",
    "improved",
    "increased",
    "launched",
    "led",
    "managed",
    "optimized",
    "organized",
    "reduced",
    "supervised",
];

const PRESENT_TENSE_VERBS: &[&str] = &[
    "achieve",
    "analyze",
    "build",
    "builds",
    "collaborate",
    "coordinate",
    "create",
    "creates",
    "deliver",
    "design",
    "designs",
    "develop",
    "develops",
    "establish",
    "implement",
    "improve",
    "increase",
    "launch",
    "lead",
    "leads",
    "manage",
    "manages",
    "optimize",
    "organize",
    "reduce",
    "supervise",
];

static PAST_TENSE: Lazy<Regex> = Lazy::new(|| verb_pattern(PAST_TENSE_VERBS));
static PRESENT_TENSE: Lazy<Regex> = Lazy::new(|| verb_pattern(PRESENT_TENSE_VERBS));

/// ALL-CAPS-with-spaces line of at least three characters.
static CAPS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z ]{2,}$").expect("valid caps header pattern"));
/// Markdown heading whose text starts with a capital letter.
static MARKDOWN_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+\s*[A-Z]").expect("valid markdown header pattern"));
static CURRENT_ROLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:present|current|ongoing|now)\b").expect("valid current role pattern")
});

fn verb_pattern(verbs: &[&str]) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{})\b", verbs.join("|"))).expect("valid verb list pattern")
}

/// A header line and the lines beneath it up to the next header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSection<'a> {
    /// Empty for text that precedes the first header.
    pub header: &'a str,
    pub body: Vec<&'a str>,
}

pub fn is_section_header(line: &str) -> bool {
    let line = line.trim();
    line.len() < MAX_HEADER_LEN && (CAPS_HEADER.is_match(line) || MARKDOWN_HEADER.is_match(line))
}

/// Splits text into sections at header lines.
pub fn split_sections(text: &str) -> Vec<TextSection<'_>> {
    let mut sections = vec![TextSection {
        header: "",
        body: vec![],
    }];

    for line in text.lines() {
        if is_section_header(line) {
            sections.push(TextSection {
                header: line.trim().trim_start_matches('#').trim(),
                body: vec![],
            });
        } else if let Some(current) = sections.last_mut() {
            current.body.push(line);
        }
    }

    // Drop the leading pseudo-section when the text opens with a header.
    sections.retain(|s| !s.header.is_empty() || s.body.iter().any(|l| !l.trim().is_empty()));
    sections
}

pub fn check_tense(text: &str) -> CheckOutcome {
    let issues = split_sections(text)
        .iter()
        .filter_map(section_issue)
        .collect();

    CheckOutcome {
        issues,
        finding: PatternFinding::None,
    }
}

fn section_issue(section: &TextSection<'_>) -> Option<ConsistencyIssue> {
    let body = section.body.join("\n");
    let past = PAST_TENSE.find_iter(&body).count();
    let present = PRESENT_TENSE.find_iter(&body).count();

    if past == 0 || present == 0 {
        return None;
    }

    let past_share = past as f64 / (past + present) as f64;
    if past_share <= MIXED_LOWER || past_share >= MIXED_UPPER {
        return None;
    }

    let location = if section.header.is_empty() {
        "Top of document".to_string()
    } else {
        section.header.to_string()
    };

    let suggestion = if CURRENT_ROLE.is_match(section.header) {
        "This looks like a current role: use present tense throughout (e.g. \"Manage\", \"Develop\")"
    } else {
        "Use past tense throughout for completed work (e.g. \"Managed\", \"Developed\")"
    };

    Some(ConsistencyIssue {
        kind: TENSE_ISSUE.to_string(),
        severity: Severity::High,
        location: location.clone(),
        text: format!("{past} past-tense and {present} present-tense verbs"),
        message: format!("Mixed verb tenses in {location}"),
        suggestion: suggestion.to_string(),
        pattern: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_detection() {
        assert!(is_section_header("EXPERIENCE"));
        assert!(is_section_header("WORK HISTORY"));
        assert!(is_section_header("## Experience"));
        assert!(is_section_header("# Projects"));
        assert!(!is_section_header("AB"));
        assert!(!is_section_header("Experience"));
        assert!(!is_section_header("# lowercase heading"));
        assert!(!is_section_header("- MANAGED TEAMS"));
        assert!(!is_section_header(&"A".repeat(60)));
    }

    #[test]
    fn test_split_sections() {
        let text = "Jane Doe\nEXPERIENCE\n- Managed\nEDUCATION\nBS\n";
        let sections = split_sections(text);
        let headers: Vec<&str> = sections.iter().map(|s| s.header).collect();
        assert_eq!(headers, vec!["", "EXPERIENCE", "EDUCATION"]);
        assert_eq!(sections[1].body, vec!["- Managed"]);
    }

    #[test]
    fn test_split_drops_empty_preamble() {
        let sections = split_sections("SKILLS\nRust\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].header, "SKILLS");
    }

    #[test]
    fn test_markdown_header_text_is_cleaned() {
        let sections = split_sections("## Current Role\n- Manage team\n");
        assert_eq!(sections[0].header, "Current Role");
    }

    #[test]
    fn test_mixed_section_is_flagged_past_suggestion() {
        let text = "EXPERIENCE\n- Managed a team\n- Develop APIs\n";
        let outcome = check_tense(text);
        assert_eq!(outcome.issues.len(), 1);
        let issue = &outcome.issues[0];
        assert_eq!(issue.kind, TENSE_ISSUE);
        assert_eq!(issue.location, "EXPERIENCE");
        assert!(issue.suggestion.contains("past tense"));
    }

    #[test]
    fn test_current_role_header_suggests_present() {
        let text = "CURRENT POSITION\n- Managed a team\n- Develop APIs\n";
        let outcome = check_tense(text);
        assert_eq!(outcome.issues.len(), 1);
        assert!(outcome.issues[0].suggestion.contains("present tense"));
    }

    #[test]
    fn test_dominant_tense_is_not_flagged() {
        // 4 past, 1 present → 0.8 share, on the boundary.
        let text = "EXPERIENCE\nManaged. Led. Built. Designed. Develop.\n";
        assert!(check_tense(text).issues.is_empty());
    }

    #[test]
    fn test_sections_are_judged_independently() {
        let text = "PAST ROLE\n- Managed\n- Led\nNOW ROLE\n- Manage\n- Lead\n";
        assert!(check_tense(text).issues.is_empty());
    }

    #[test]
    fn test_word_boundaries_apply() {
        // "leader" and "management" are not verbs from either list.
        let text = "EXPERIENCE\nTeam leader in management. Managed budgets.\n";
        assert!(check_tense(text).issues.is_empty());
    }
}
