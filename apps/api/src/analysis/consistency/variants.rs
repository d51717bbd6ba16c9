//! Primary/minority tallying shared by the date-format and bullet-style checks.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One named variant (a date format, a bullet marker) and its pattern.
pub struct VariantDef {
    pub name: &'static str,
    pub example: &'static str,
    pub pattern: Lazy<Regex>,
}

/// How often a variant occurred in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCount {
    pub name: String,
    pub example: String,
    pub count: usize,
}

/// Counts each variant, keeping only those seen at least once, in
/// declaration order.
pub fn tally(defs: &[VariantDef], text: &str) -> Vec<VariantCount> {
    defs.iter()
        .filter_map(|def| {
            let count = def.pattern.find_iter(text).count();
            (count > 0).then(|| VariantCount {
                name: def.name.to_string(),
                example: def.example.to_string(),
                count,
            })
        })
        .collect()
}

/// Most frequent variant. Ties go to the earliest declared variant.
pub fn primary(counts: &[VariantCount]) -> Option<&VariantCount> {
    counts.iter().fold(None, |best: Option<&VariantCount>, c| match best {
        Some(b) if b.count >= c.count => Some(b),
        _ => Some(c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(name: &str, n: usize) -> VariantCount {
        VariantCount {
            name: name.to_string(),
            example: String::new(),
            count: n,
        }
    }

    #[test]
    fn test_primary_is_highest_count() {
        let counts = vec![count("a", 1), count("b", 3), count("c", 2)];
        assert_eq!(primary(&counts).unwrap().name, "b");
    }

    #[test]
    fn test_primary_tie_goes_to_first_declared() {
        let counts = vec![count("a", 2), count("b", 2), count("c", 1)];
        assert_eq!(primary(&counts).unwrap().name, "a");
    }

    #[test]
    fn test_primary_of_empty_is_none() {
        assert!(primary(&[]).is_none());
    }

    #[test]
    fn test_tally_skips_unseen_variants() {
        static DEFS: [VariantDef; 2] = [
            VariantDef {
                name: "digits",
                example: "42",
                pattern: Lazy::new(|| Regex::new(r"\d+").unwrap()),
            },
            VariantDef {
                name: "hashes",
                example: "#",
                pattern: Lazy::new(|| Regex::new(r"#+").unwrap()),
            },
        ];
        let counts = tally(&DEFS, "1 and 22 and 333");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].name, "digits");
        assert_eq!(counts[0].count, 3);
    }
}
