//! Skill/Keyword Matcher — boundary-delimited, case-insensitive presence test
//! of a phrase list against resume text.
//!
//! No fuzzy credit: a multi-word phrase must appear contiguously. Terms are
//! escaped before compiling, so "C++" or "Node.js" match literally.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Outcome of matching one requirement category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermMatch {
    /// Unrounded 0–100.
    pub percentage: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub total: usize,
}

impl TermMatch {
    /// An empty requirement list cannot be failed.
    fn vacuous() -> Self {
        Self {
            percentage: 100.0,
            matched: vec![],
            missing: vec![],
            total: 0,
        }
    }
}

/// Tests every term against `haystack_lower` and partitions them into
/// matched / missing, preserving input order.
pub fn match_terms(haystack_lower: &str, terms: &[String]) -> TermMatch {
    let terms: Vec<&str> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        return TermMatch::vacuous();
    }

    let total = terms.len();
    let (matched, missing): (Vec<&str>, Vec<&str>) = terms
        .into_iter()
        .partition(|term| contains_term(haystack_lower, term));

    TermMatch {
        percentage: matched.len() as f64 / total as f64 * 100.0,
        matched: matched.into_iter().map(str::to_string).collect(),
        missing: missing.into_iter().map(str::to_string).collect(),
        total,
    }
}

/// True if `term` occurs in `haystack` as a whole phrase.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    match term_pattern(term) {
        Ok(re) => re.is_match(haystack),
        Err(_) => haystack.contains(&term.to_lowercase()),
    }
}

/// Builds the literal, case-insensitive pattern for a term.
///
/// A `\b` is only placed on an edge that is a word character: `\b` next to
/// a symbol (the `+` in "C++") would demand a word character after it.
fn term_pattern(term: &str) -> Result<Regex, regex::Error> {
    let starts_word = term.chars().next().is_some_and(is_word_char);
    let ends_word = term.chars().last().is_some_and(is_word_char);

    let pattern = format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        regex::escape(term),
        if ends_word { r"\b" } else { "" },
    );

    RegexBuilder::new(&pattern).case_insensitive(true).build()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
