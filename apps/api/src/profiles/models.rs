use serde::{Deserialize, Serialize};

/// Contact block shown at the top of every resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: Option<String>,
    pub relevant_coursework: Vec<String>,
    pub achievements: Vec<String>,
}

/// A single job. `description` holds the bullets in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Vec<String>,
    pub skills_used: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub achievements: Vec<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub languages: Vec<String>,
    pub tools: Vec<String>,
    pub soft_skills: Vec<String>,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty()
            && self.languages.is_empty()
            && self.tools.is_empty()
            && self.soft_skills.is_empty()
    }
}

/// The user's master record. Persisted as one JSON file per profile name.
///
/// Every field defaults so partially-filled files still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub personal_info: PersonalInfo,
    pub summary: String,
    /// Free-form narrative used only for story generation (why-statements, cover letters).
    pub my_story: String,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Skills,
    pub certifications: Vec<String>,
    pub awards: Vec<String>,
}

/// Structured analysis of the target job description, attached to a tailored resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobAnalysis {
    pub required_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub experience_years: String,
    pub responsibilities: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub culture_keywords: Vec<String>,
}

/// Job-specific rewrite of a profile.
///
/// Mirrors the profile's resume fields one-to-one: same entries, same order.
/// Only text inside summary, experience and projects differs from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailoredResume {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Skills,
    pub certifications: Vec<String>,
    pub awards: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_analysis: Option<JobAnalysis>,
}

impl TailoredResume {
    /// Starting point for generation: every field copied through unmodified.
    pub fn from_profile(profile: &Profile) -> Self {
        TailoredResume {
            personal_info: profile.personal_info.clone(),
            summary: profile.summary.clone(),
            education: profile.education.clone(),
            experience: profile.experience.clone(),
            projects: profile.projects.clone(),
            skills: profile.skills.clone(),
            certifications: profile.certifications.clone(),
            awards: profile.awards.clone(),
            job_analysis: None,
        }
    }
}

/// LLMs return "3+" as often as 3.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_profile_json_fills_defaults() {
        let json = r#"{
            "personal_info": {"name": "Jane Doe", "email": "j@x.com"},
            "experience": [{"title": "Engineer", "company": "Acme", "description": ["Did X"]}]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.personal_info.name, "Jane Doe");
        assert_eq!(profile.personal_info.phone, "");
        assert_eq!(profile.experience[0].description, vec!["Did X"]);
        assert!(profile.experience[0].skills_used.is_empty());
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn test_tailored_resume_copies_profile_fields() {
        let profile = Profile {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                ..Default::default()
            },
            certifications: vec!["AWS SAA".to_string()],
            my_story: "Grew up fixing radios".to_string(),
            ..Default::default()
        };
        let resume = TailoredResume::from_profile(&profile);
        assert_eq!(resume.personal_info, profile.personal_info);
        assert_eq!(resume.certifications, profile.certifications);
        assert!(resume.job_analysis.is_none());
    }

    #[test]
    fn test_job_analysis_accepts_numeric_years() {
        let analysis: JobAnalysis =
            serde_json::from_str(r#"{"required_skills": ["Python"], "experience_years": 3}"#)
                .unwrap();
        assert_eq!(analysis.experience_years, "3");
        assert_eq!(analysis.required_skills, vec!["Python"]);
        assert!(analysis.culture_keywords.is_empty());
    }

    #[test]
    fn test_job_analysis_is_omitted_when_absent() {
        let value = serde_json::to_value(TailoredResume::default()).unwrap();
        assert!(value.get("job_analysis").is_none());
    }
}
