use serde::{Deserialize, Serialize};

/// Structured requirements produced by the external job-description parser.
///
/// Empty lists and a null experience requirement mean "no requirement" and
/// are scored as vacuously satisfied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequirements {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub required_experience: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_requirements_camel_case_deserializes() {
        let json = r#"{
            "requiredSkills": ["Rust", "SQL"],
            "preferredSkills": ["Kafka"],
            "keywords": ["distributed systems"],
            "tools": ["Docker"],
            "requiredExperience": "5+ years of backend experience"
        }"#;
        let job: JobRequirements = serde_json::from_str(json).unwrap();
        assert_eq!(job.required_skills, vec!["Rust", "SQL"]);
        assert_eq!(job.tools, vec!["Docker"]);
        assert_eq!(
            job.required_experience.as_deref(),
            Some("5+ years of backend experience")
        );
    }

    #[test]
    fn test_null_and_missing_fields_mean_no_requirement() {
        let json = r#"{"requiredSkills": [], "requiredExperience": null}"#;
        let job: JobRequirements = serde_json::from_str(json).unwrap();
        assert!(job.required_skills.is_empty());
        assert!(job.preferred_skills.is_empty());
        assert!(job.keywords.is_empty());
        assert!(job.required_experience.is_none());
    }
}
