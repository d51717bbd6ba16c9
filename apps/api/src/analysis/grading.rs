use std::fmt;

use serde::{Deserialize, Serialize};

/// Letter grade shared by the match scorer, the consistency checker and the
/// polish report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

/// Lower bound (inclusive) for each passing grade, highest first.
const GRADE_THRESHOLDS: &[(u32, Grade)] = &[
    (90, Grade::A),
    (80, Grade::B),
    (70, Grade::C),
    (60, Grade::D),
];

/// Maps a 0–100 score to its letter grade.
pub fn grade_for_score(score: u32) -> Grade {
    GRADE_THRESHOLDS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}
