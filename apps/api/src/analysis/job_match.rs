//! Job-Match Scorer — weighted multi-factor score of a resume against parsed
//! job requirements.
//!
//! Pure and deterministic: the same resume and requirements always produce
//! the same `MatchResult`. Nothing is cached between calls.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::grading::{grade_for_score, Grade};
use crate::analysis::matcher::{match_terms, TermMatch};
use crate::analysis::recommendation::{Priority, Recommendation, RecommendationKind};
use crate::analysis::tenure::{assess_experience, total_tenure_years_at, ExperienceAssessment};
use crate::analysis::text_extractor::extract_text;
use crate::analysis::AnalysisError;
use crate::models::job::JobRequirements;
use crate::models::resume::ResumeDocument;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Per-factor sub-scores, each rounded for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    pub required_skills: u32,
    pub preferred_skills: u32,
    pub keywords: u32,
    pub tools: u32,
    pub experience: u32,
}

/// Terms grouped by requirement category (used for both matched and gaps).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTerms {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub keywords: Vec<String>,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub overall_score: u32,
    pub grade: Grade,
    pub breakdown: MatchBreakdown,
    pub matched: CategoryTerms,
    pub gaps: CategoryTerms,
    pub experience: ExperienceAssessment,
    pub recommendations: Vec<Recommendation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

pub const REQUIRED_SKILLS_WEIGHT: f64 = 0.35;
pub const PREFERRED_SKILLS_WEIGHT: f64 = 0.15;
pub const KEYWORDS_WEIGHT: f64 = 0.25;
pub const TOOLS_WEIGHT: f64 = 0.15;
pub const EXPERIENCE_WEIGHT: f64 = 0.10;

/// Number of missing terms spelled out in a recommendation description.
const DESCRIPTION_TERM_LIMIT: usize = 5;

const CRITICAL_OVERALL_BELOW: u32 = 50;
const HIGH_OVERALL_BELOW: u32 = 70;

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores `resume` against `job`, measuring tenure up to today.
pub fn score_match(
    resume: &ResumeDocument,
    job: &JobRequirements,
) -> Result<MatchResult, AnalysisError> {
    score_match_at(resume, job, Utc::now().date_naive())
}

/// Algorithm:
/// 1. Extract resume text once and lower-case it
/// 2. Match each requirement category independently
/// 3. Sum tenure across experience items and compare with the requirement
/// 4. overall = Σ(sub-percentage × weight), rounded only for presentation
/// 5. Build recommendations: category gaps in fixed order, then the overall
///    recommendation prepended when the score is below 70
pub fn score_match_at(
    resume: &ResumeDocument,
    job: &JobRequirements,
    today: NaiveDate,
) -> Result<MatchResult, AnalysisError> {
    let text = extract_text(resume);
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResume);
    }
    let haystack = text.to_lowercase();

    let [required, preferred, keywords, tools] =
        TermCategory::ALL.map(|category| category.evaluate(&haystack, job));

    let experience = assess_experience(
        total_tenure_years_at(resume, today),
        job.required_experience.as_deref(),
    );

    let weighted = weighted_score(
        required.percentage,
        preferred.percentage,
        keywords.percentage,
        tools.percentage,
        experience.percentage,
    );
    let overall_score = present(weighted);

    let breakdown = MatchBreakdown {
        required_skills: present(required.percentage),
        preferred_skills: present(preferred.percentage),
        keywords: present(keywords.percentage),
        tools: present(tools.percentage),
        experience: present(experience.percentage),
    };

    let (matched, gaps) = split_categories(required, preferred, keywords, tools);
    let recommendations = build_recommendations(overall_score, &gaps, &experience);

    debug!(
        overall_score,
        required = breakdown.required_skills,
        recommendations = recommendations.len(),
        "job match scored"
    );

    Ok(MatchResult {
        overall_score,
        grade: grade_for_score(overall_score),
        breakdown,
        matched,
        gaps,
        experience,
        recommendations,
    })
}

/// The fixed-weight blend of the five sub-percentages.
pub fn weighted_score(
    required: f64,
    preferred: f64,
    keywords: f64,
    tools: f64,
    experience: f64,
) -> f64 {
    required * REQUIRED_SKILLS_WEIGHT
        + preferred * PREFERRED_SKILLS_WEIGHT
        + keywords * KEYWORDS_WEIGHT
        + tools * TOOLS_WEIGHT
        + experience * EXPERIENCE_WEIGHT
}

fn present(percentage: f64) -> u32 {
    percentage.round().clamp(0.0, 100.0) as u32
}

/// Requirement categories matched by term presence. Each reads only its own
/// list and the shared haystack, so any one can be evaluated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermCategory {
    RequiredSkills,
    PreferredSkills,
    Keywords,
    Tools,
}

impl TermCategory {
    pub const ALL: [TermCategory; 4] = [
        TermCategory::RequiredSkills,
        TermCategory::PreferredSkills,
        TermCategory::Keywords,
        TermCategory::Tools,
    ];

    pub fn terms(self, job: &JobRequirements) -> &[String] {
        match self {
            TermCategory::RequiredSkills => &job.required_skills,
            TermCategory::PreferredSkills => &job.preferred_skills,
            TermCategory::Keywords => &job.keywords,
            TermCategory::Tools => &job.tools,
        }
    }

    pub fn evaluate(self, haystack_lower: &str, job: &JobRequirements) -> TermMatch {
        match_terms(haystack_lower, self.terms(job))
    }
}

fn split_categories(
    required: TermMatch,
    preferred: TermMatch,
    keywords: TermMatch,
    tools: TermMatch,
) -> (CategoryTerms, CategoryTerms) {
    let matched = CategoryTerms {
        required_skills: required.matched,
        preferred_skills: preferred.matched,
        keywords: keywords.matched,
        tools: tools.matched,
    };
    let gaps = CategoryTerms {
        required_skills: required.missing,
        preferred_skills: preferred.missing,
        keywords: keywords.missing,
        tools: tools.missing,
    };
    (matched, gaps)
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendations
// ────────────────────────────────────────────────────────────────────────────

/// Category order is fixed: required skills → keywords → tools → preferred
/// skills, followed by the experience gap. The overall recommendation, when
/// present, is always first.
fn build_recommendations(
    overall_score: u32,
    gaps: &CategoryTerms,
    experience: &ExperienceAssessment,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if !gaps.required_skills.is_empty() {
        let mut rec = Recommendation::new(
            Priority::Critical,
            RecommendationKind::MissingRequiredSkills,
            format!(
                "Your resume is missing {} required skill(s): {}",
                gaps.required_skills.len(),
                summarize_terms(&gaps.required_skills)
            ),
            "Add these skills to your skills section and show them in action in your experience bullets",
            "Required skills account for 35% of the match score",
        )
        .with_title("Add missing required skills");
        rec.skills = Some(gaps.required_skills.clone());
        recs.push(rec);
    }

    if !gaps.keywords.is_empty() {
        let mut rec = Recommendation::new(
            Priority::High,
            RecommendationKind::MissingKeywords,
            format!(
                "{} job keyword(s) do not appear in your resume: {}",
                gaps.keywords.len(),
                summarize_terms(&gaps.keywords)
            ),
            "Work these phrases naturally into your summary and bullet points",
            "Keywords account for 25% of the match score and drive ATS ranking",
        )
        .with_title("Incorporate job keywords");
        rec.keywords = Some(gaps.keywords.clone());
        recs.push(rec);
    }

    if !gaps.tools.is_empty() {
        let mut rec = Recommendation::new(
            Priority::Medium,
            RecommendationKind::MissingTools,
            format!(
                "{} tool(s) from the posting are not mentioned: {}",
                gaps.tools.len(),
                summarize_terms(&gaps.tools)
            ),
            "List the tools you have used and name them in the projects where you used them",
            "Tools account for 15% of the match score",
        )
        .with_title("Mention required tools");
        rec.tools = Some(gaps.tools.clone());
        recs.push(rec);
    }

    if !gaps.preferred_skills.is_empty() {
        let mut rec = Recommendation::new(
            Priority::Low,
            RecommendationKind::MissingPreferredSkills,
            format!(
                "Consider highlighting {} preferred skill(s): {}",
                gaps.preferred_skills.len(),
                summarize_terms(&gaps.preferred_skills)
            ),
            "Add any preferred skills you genuinely have",
            "Preferred skills account for 15% of the match score",
        )
        .with_title("Highlight preferred skills");
        rec.skills = Some(gaps.preferred_skills.clone());
        recs.push(rec);
    }

    if let Some(required_years) = experience.required_years {
        if experience.percentage < 100.0 {
            recs.push(
                Recommendation::new(
                    Priority::Medium,
                    RecommendationKind::ExperienceGap,
                    format!(
                        "The role asks for {required_years} years of experience; your listed positions total {:.1}",
                        experience.candidate_years
                    ),
                    "Make sure every relevant position has start and end dates, including internships and contract work",
                    "Experience accounts for 10% of the match score",
                )
                .with_title("Close the experience gap"),
            );
        }
    }

    if let Some(overall) = overall_recommendation(overall_score) {
        recs.insert(0, overall);
    }

    recs
}

fn overall_recommendation(overall_score: u32) -> Option<Recommendation> {
    if overall_score < CRITICAL_OVERALL_BELOW {
        Some(
            Recommendation::new(
                Priority::Critical,
                RecommendationKind::OverallMatch,
                format!("Your resume matches only {overall_score}% of this job's requirements"),
                "Tailor your resume substantially before applying: address the missing required skills and keywords first",
                "Low-matching resumes are usually filtered out by applicant tracking systems",
            )
            .with_title("Low match score"),
        )
    } else if overall_score < HIGH_OVERALL_BELOW {
        Some(
            Recommendation::new(
                Priority::High,
                RecommendationKind::OverallMatch,
                format!("Your resume matches {overall_score}% of this job's requirements"),
                "Tailor your resume to close the gaps listed below",
                "Reaching 70% or more noticeably improves screening odds",
            )
            .with_title("Moderate match score"),
        )
    } else {
        None
    }
}

/// First few terms, with a count of the remainder.
fn summarize_terms(terms: &[String]) -> String {
    let shown = terms
        .iter()
        .take(DESCRIPTION_TERM_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    match terms.len().saturating_sub(DESCRIPTION_TERM_LIMIT) {
        0 => shown,
        rest => format!("{shown} and {rest} more"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Section, SectionContent, SectionType};
    use proptest::prelude::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn text_resume(text: &str) -> ResumeDocument {
        ResumeDocument { sections: vec![Section {
            section_type: SectionType::Summary,
            title: String::new(),
            content: SectionContent {
                text: Some(text.to_string()),
                items: None,
            },
        }] }
    }

    #[test]
    fn test_categories_evaluate_independently() {
        let haystack = "rust developer using docker and kafka";
        let base = job(&["Rust", "Go"], &["Kafka"], &["developer"], &["Docker", "Helm"]);
        let mut changed = base.clone();
        changed.required_skills = vec!["Haskell".to_string()];

        for category in TermCategory::ALL {
            assert_eq!(
                category.evaluate(haystack, &base),
                match_terms(haystack, category.terms(&base)),
                "{category:?} depends only on its own terms"
            );
        }
        for category in &TermCategory::ALL[1..] {
            assert_eq!(
                category.evaluate(haystack, &base),
                category.evaluate(haystack, &changed),
                "{category:?} is unaffected by required skills"
            );
        }
        assert_eq!(TermCategory::RequiredSkills.evaluate(haystack, &base).percentage, 50.0);
        assert_eq!(TermCategory::Tools.evaluate(haystack, &base).percentage, 50.0);
    }

    fn job(
        required: &[&str],
        preferred: &[&str],
        keywords: &[&str],
        tools: &[&str],
    ) -> JobRequirements {
        let owned = |l: &[&str]| l.iter().map(|s| s.to_string()).collect();
        JobRequirements {
            required_skills: owned(required),
            preferred_skills: owned(preferred),
            keywords: owned(keywords),
            tools: owned(tools),
            required_experience: None,
        }
    }

    #[test]
    fn test_missing_required_skill_end_to_end() {
        let resume = text_resume("Led engineering team. - Built system.\n- Deployed service\n");
        let result = score_match_at(&resume, &job(&["Python"], &[], &[], &[]), today()).unwrap();

        assert_eq!(result.breakdown.required_skills, 0);
        assert_eq!(result.breakdown.preferred_skills, 100);
        assert_eq!(result.breakdown.keywords, 100);
        assert_eq!(result.breakdown.tools, 100);
        assert_eq!(result.breakdown.experience, 100);
        assert_eq!(result.overall_score, 65);
        assert_eq!(result.grade, Grade::D);
        assert_eq!(result.gaps.required_skills, vec!["Python"]);

        // Overall (high, since 50 ≤ 65 < 70) comes first, then the category gap.
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.recommendations[0].kind, RecommendationKind::OverallMatch);
        assert_eq!(result.recommendations[0].priority, Priority::High);
        assert_eq!(
            result.recommendations[1].kind,
            RecommendationKind::MissingRequiredSkills
        );
    }

    #[test]
    fn test_perfect_match_scores_a_without_overall_recommendation() {
        let resume =
            text_resume("Rust and PostgreSQL services deployed with Docker; distributed systems");
        let result = score_match_at(
            &resume,
            &job(&["Rust"], &["PostgreSQL"], &["distributed systems"], &["Docker"]),
            today(),
        )
        .unwrap();
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.grade, Grade::A);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_low_score_prepends_critical_overall() {
        let resume = text_resume("Gardening and cooking");
        let result = score_match_at(
            &resume,
            &job(&["Rust"], &["Go"], &["microservices"], &["Kubernetes"]),
            today(),
        )
        .unwrap();
        assert_eq!(result.overall_score, 10);
        assert_eq!(result.recommendations[0].priority, Priority::Critical);
        assert_eq!(result.recommendations[0].kind, RecommendationKind::OverallMatch);

        let order: Vec<RecommendationKind> =
            result.recommendations.iter().skip(1).map(|r| r.kind).collect();
        assert_eq!(
            order,
            vec![
                RecommendationKind::MissingRequiredSkills,
                RecommendationKind::MissingKeywords,
                RecommendationKind::MissingTools,
                RecommendationKind::MissingPreferredSkills,
            ]
        );
    }

    #[test]
    fn test_description_truncates_but_field_keeps_full_list() {
        let resume = text_resume("Nothing relevant");
        let required = ["A1", "B2", "C3", "D4", "E5", "F6", "G7"];
        let result = score_match_at(&resume, &job(&required, &[], &[], &[]), today()).unwrap();

        let rec = result
            .recommendations
            .iter()
            .find(|r| r.kind == RecommendationKind::MissingRequiredSkills)
            .unwrap();
        assert!(rec.description.contains("A1, B2, C3, D4, E5 and 2 more"));
        assert!(!rec.description.contains("F6"));
        assert_eq!(rec.skills.as_ref().unwrap().len(), 7);
    }

    #[test]
    fn test_experience_requirement_uses_summed_tenure() {
        let mut resume = text_resume("Rust");
        resume.sections.push(Section {
            section_type: SectionType::Experience,
            title: "Experience".to_string(),
            content: SectionContent {
                text: None,
                items: Some(vec![
                    json!({"startDate": "2021-01-01", "endDate": "2022-01-01"})
                        .as_object()
                        .unwrap()
                        .clone(),
                    json!({"startDate": "2022-01-01", "endDate": "Present"})
                        .as_object()
                        .unwrap()
                        .clone(),
                ]),
            },
        });
        let mut requirements = job(&["Rust"], &[], &[], &[]);
        requirements.required_experience = Some("6+ years".to_string());

        let result = score_match_at(&resume, &requirements, today()).unwrap();
        assert_eq!(result.experience.required_years, Some(6));
        // 365 + 730 days ≈ 3 years of 6 → 50%
        assert_eq!(result.breakdown.experience, 50);
        assert_eq!(result.overall_score, 95);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.kind == RecommendationKind::ExperienceGap));
    }

    #[test]
    fn test_empty_resume_is_rejected() {
        let err = score_match_at(&ResumeDocument::default(), &JobRequirements::default(), today())
            .unwrap_err();
        assert_eq!(err, AnalysisError::EmptyResume);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total = REQUIRED_SKILLS_WEIGHT
            + PREFERRED_SKILLS_WEIGHT
            + KEYWORDS_WEIGHT
            + TOOLS_WEIGHT
            + EXPERIENCE_WEIGHT;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_terms_short_list() {
        let terms = vec!["Rust".to_string(), "Go".to_string()];
        assert_eq!(summarize_terms(&terms), "Rust, Go");
    }

    proptest! {
        #[test]
        fn prop_overall_reproducible_from_breakdown(
            req_hits in 0usize..4, pref_hits in 0usize..4,
            kw_hits in 0usize..4, tool_hits in 0usize..4,
        ) {
            let pool = ["alpha", "bravo", "charlie"];
            let words: Vec<&str> = pool.iter().copied().collect();
            let text = format!(
                "{} {} {} {}",
                words[..req_hits.min(3)].join(" "),
                words[..pref_hits.min(3)].join(" "),
                words[..kw_hits.min(3)].join(" "),
                words[..tool_hits.min(3)].join(" "),
            );
            let resume = text_resume(&format!("resume {text}"));
            let requirements = job(
                &pool,
                &["bravo", "zulu"],
                &["charlie", "yankee", "xray"],
                &["alpha"],
            );
            let result = score_match_at(&resume, &requirements, today()).unwrap();
            let b = result.breakdown;
            let rederived = weighted_score(
                b.required_skills as f64,
                b.preferred_skills as f64,
                b.keywords as f64,
                b.tools as f64,
                b.experience as f64,
            );
            prop_assert!((rederived - result.overall_score as f64).abs() <= 1.0);
        }
    }
}
