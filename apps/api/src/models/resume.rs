use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed set of resume section kinds produced by the section editor.
/// Unrecognised kinds deserialize as `Custom` instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Awards,
    Publications,
    Volunteer,
    Languages,
    #[serde(other)]
    Custom,
}

/// A flat record inside a section (one job, one degree, one project).
///
/// Leaf values are primitives or string arrays; field order is preserved
/// so extraction walks fields in the order they were stored.
pub type SectionItem = Map<String, Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SectionItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: SectionContent,
}

/// Ordered sequence of sections as supplied by the editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeDocument {
    pub sections: Vec<Section>,
}

impl ResumeDocument {
    /// Sections whose items carry employment date ranges.
    pub fn experience_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|s| s.section_type == SectionType::Experience)
    }
}
