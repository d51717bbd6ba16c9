use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    // Job match
    OverallMatch,
    MissingRequiredSkills,
    MissingKeywords,
    MissingTools,
    MissingPreferredSkills,
    ExperienceGap,
    // Consistency
    DateFormat,
    BulletStyle,
    Punctuation,
    Tense,
}

/// An actionable suggestion. Category recommendations carry the complete
/// list of terms even when the description shows only the first few.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub action: String,
    pub impact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl Recommendation {
    pub fn new(
        priority: Priority,
        kind: RecommendationKind,
        description: impl Into<String>,
        action: impl Into<String>,
        impact: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            kind,
            title: None,
            description: description.into(),
            action: action.into(),
            impact: impact.into(),
            skills: None,
            keywords: None,
            tools: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
