use crate::errors::AppError;
use crate::profiles::models::Profile;

/// Checks the fields a profile cannot be saved without.
///
/// Experience needs a title and company, education a degree and institution,
/// projects a name. Contact details are optional here; export enforces the name.
pub fn validate_profile(profile: &Profile) -> Result<(), AppError> {
    let mut problems = Vec::new();

    for (i, exp) in profile.experience.iter().enumerate() {
        if exp.title.trim().is_empty() {
            problems.push(format!("experience[{i}].title is required"));
        }
        if exp.company.trim().is_empty() {
            problems.push(format!("experience[{i}].company is required"));
        }
    }

    for (i, edu) in profile.education.iter().enumerate() {
        if edu.degree.trim().is_empty() {
            problems.push(format!("education[{i}].degree is required"));
        }
        if edu.institution.trim().is_empty() {
            problems.push(format!("education[{i}].institution is required"));
        }
    }

    for (i, project) in profile.projects.iter().enumerate() {
        if project.name.trim().is_empty() {
            problems.push(format!("projects[{i}].name is required"));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::models::{EducationEntry, ExperienceEntry, ProjectEntry};

    #[test]
    fn test_empty_profile_is_valid() {
        assert!(validate_profile(&Profile::default()).is_ok());
    }

    #[test]
    fn test_experience_without_company_is_rejected() {
        let profile = Profile {
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "  ".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = validate_profile(&profile).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("experience[0].company")));
    }

    #[test]
    fn test_all_problems_are_reported_together() {
        let profile = Profile {
            education: vec![EducationEntry::default()],
            projects: vec![ProjectEntry::default()],
            ..Default::default()
        };
        match validate_profile(&profile) {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("education[0].degree"));
                assert!(msg.contains("education[0].institution"));
                assert!(msg.contains("projects[0].name"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
