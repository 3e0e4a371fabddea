//! Format-neutral layout of a tailored resume.
//!
//! Section order and skipping rules live here once; the text, PDF and DOCX
//! renderers only decide how each block looks.

use crate::errors::AppError;
use crate::export::ExportOptions;
use crate::profiles::models::{EducationEntry, ExperienceEntry, ProjectEntry, TailoredResume};

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Candidate name, the document title.
    Name(String),
    /// Email, phone and location joined on one line.
    Contact(String),
    /// "LinkedIn: ..." style line under the contact line.
    Link(String),
    Heading(&'static str),
    /// Bold first line of an entry, e.g. "Engineer - Acme".
    EntryTitle(String),
    /// Dates, location or technologies under an entry title.
    EntryMeta(String),
    Paragraph(String),
    Bullet(String),
    /// "Technical: Rust, SQL" style line.
    Labeled { label: &'static str, value: String },
    /// Vertical space after an entry.
    Gap,
}

/// Lays out `resume` in export order:
/// personal info, summary, experience, projects, education, skills, certifications, awards.
pub fn build_blocks(resume: &TailoredResume, opts: &ExportOptions) -> Result<Vec<Block>, AppError> {
    let personal = &resume.personal_info;
    let name = personal.name.trim();
    if name.is_empty() {
        return Err(AppError::EmptyResume);
    }

    let mut blocks = vec![Block::Name(name.to_string())];

    let contact = non_empty(&[
        personal.email.as_str(),
        personal.phone.as_str(),
        personal.location.as_str(),
    ]).join(" | ");
    if !contact.is_empty() {
        blocks.push(Block::Contact(contact));
    }
    for (label, value) in [
        ("LinkedIn", &personal.linkedin),
        ("GitHub", &personal.github),
        ("Portfolio", &personal.portfolio),
    ] {
        if !value.trim().is_empty() {
            blocks.push(Block::Link(format!("{label}: {}", value.trim())));
        }
    }

    if opts.include_summary && !resume.summary.trim().is_empty() {
        blocks.push(Block::Heading("PROFESSIONAL SUMMARY"));
        blocks.push(Block::Paragraph(resume.summary.trim().to_string()));
    }

    if !resume.experience.is_empty() {
        blocks.push(Block::Heading("PROFESSIONAL EXPERIENCE"));
        for exp in &resume.experience {
            push_experience(&mut blocks, exp);
        }
    }

    if opts.include_projects && !resume.projects.is_empty() {
        blocks.push(Block::Heading("PROJECTS"));
        for project in &resume.projects {
            push_project(&mut blocks, project);
        }
    }

    if !resume.education.is_empty() {
        blocks.push(Block::Heading("EDUCATION"));
        for edu in &resume.education {
            push_education(&mut blocks, edu);
        }
    }

    if !resume.skills.is_empty() {
        blocks.push(Block::Heading("SKILLS"));
        for (label, values) in [
            ("Technical", &resume.skills.technical),
            ("Languages", &resume.skills.languages),
            ("Tools", &resume.skills.tools),
            ("Soft Skills", &resume.skills.soft_skills),
        ] {
            if !values.is_empty() {
                blocks.push(Block::Labeled {
                    label,
                    value: values.join(", "),
                });
            }
        }
    }

    push_list(&mut blocks, "CERTIFICATIONS", &resume.certifications);
    push_list(&mut blocks, "AWARDS", &resume.awards);

    Ok(blocks)
}

fn push_experience(blocks: &mut Vec<Block>, exp: &ExperienceEntry) {
    blocks.push(Block::EntryTitle(
        non_empty(&[exp.title.as_str(), exp.company.as_str()]).join(" - "),
    ));
    let dates = date_range(&exp.start_date, &exp.end_date);
    let meta = non_empty(&[dates.as_str(), exp.location.as_str()]).join(" | ");
    if !meta.is_empty() {
        blocks.push(Block::EntryMeta(meta));
    }
    push_bullets(blocks, &exp.description);
    blocks.push(Block::Gap);
}

fn push_project(blocks: &mut Vec<Block>, project: &ProjectEntry) {
    blocks.push(Block::EntryTitle(project.name.trim().to_string()));
    if !project.technologies.is_empty() {
        blocks.push(Block::EntryMeta(format!(
            "Technologies: {}",
            project.technologies.join(", ")
        )));
    }
    if !project.description.trim().is_empty() {
        blocks.push(Block::Paragraph(project.description.trim().to_string()));
    }
    push_bullets(blocks, &project.achievements);
    if let Some(url) = project.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        blocks.push(Block::EntryMeta(url.to_string()));
    }
    blocks.push(Block::Gap);
}

fn push_education(blocks: &mut Vec<Block>, edu: &EducationEntry) {
    blocks.push(Block::EntryTitle(edu.degree.trim().to_string()));
    let dates = date_range(&edu.start_date, &edu.end_date);
    let meta = non_empty(&[
        edu.institution.as_str(),
        edu.location.as_str(),
        dates.as_str(),
    ]).join(" | ");
    if !meta.is_empty() {
        blocks.push(Block::EntryMeta(meta));
    }
    if let Some(gpa) = edu.gpa.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        blocks.push(Block::Labeled {
            label: "GPA",
            value: gpa.to_string(),
        });
    }
    if !edu.relevant_coursework.is_empty() {
        blocks.push(Block::Labeled {
            label: "Relevant Coursework",
            value: edu.relevant_coursework.join(", "),
        });
    }
    push_bullets(blocks, &edu.achievements);
    blocks.push(Block::Gap);
}

fn push_list(blocks: &mut Vec<Block>, heading: &'static str, items: &[String]) {
    let items: Vec<&str> = items.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if items.is_empty() {
        return;
    }
    blocks.push(Block::Heading(heading));
    blocks.extend(items.into_iter().map(|s| Block::Bullet(s.to_string())));
}

fn push_bullets(blocks: &mut Vec<Block>, bullets: &[String]) {
    blocks.extend(
        bullets
            .iter()
            .map(|b| b.trim().trim_start_matches("• ").trim())
            .filter(|b| !b.is_empty())
            .map(|b| Block::Bullet(b.to_string())),
    );
}

fn date_range(start: &str, end: &str) -> String {
    non_empty(&[start, end]).join(" - ")
}

fn non_empty<'a>(parts: &[&'a str]) -> Vec<&'a str> {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::models::{PersonalInfo, Skills};

    fn resume() -> TailoredResume {
        TailoredResume {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "j@x.com".to_string(),
                github: "github.com/jane".to_string(),
                ..Default::default()
            },
            summary: "Backend engineer.".to_string(),
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: "2020".to_string(),
                description: vec!["• Did X".to_string(), " ".to_string()],
                ..Default::default()
            }],
            education: vec![EducationEntry {
                degree: "BSc".to_string(),
                institution: "State U".to_string(),
                ..Default::default()
            }],
            skills: Skills {
                technical: vec!["Rust".to_string()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn headings(blocks: &[Block]) -> Vec<&'static str> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_sections_follow_export_order_and_skip_empty() {
        let mut r = resume();
        r.projects = vec![ProjectEntry {
            name: "Ledger".to_string(),
            ..Default::default()
        }];
        let blocks = build_blocks(&r, &ExportOptions::default()).unwrap();
        assert_eq!(
            headings(&blocks),
            vec![
                "PROFESSIONAL SUMMARY",
                "PROFESSIONAL EXPERIENCE",
                "PROJECTS",
                "EDUCATION",
                "SKILLS"
            ]
        );
    }

    #[test]
    fn test_entry_lines_are_cleaned() {
        let blocks = build_blocks(&resume(), &ExportOptions::default()).unwrap();
        assert!(blocks.contains(&Block::EntryTitle("Engineer - Acme".to_string())));
        assert!(blocks.contains(&Block::EntryMeta("2020".to_string())));
        assert!(blocks.contains(&Block::Bullet("Did X".to_string())));
        assert!(blocks.contains(&Block::Link("GitHub: github.com/jane".to_string())));
        assert_eq!(
            blocks.iter().filter(|b| matches!(b, Block::Bullet(_))).count(),
            1
        );
    }

    #[test]
    fn test_options_drop_summary_and_projects() {
        let mut r = resume();
        r.projects = vec![ProjectEntry {
            name: "Ledger".to_string(),
            ..Default::default()
        }];
        let opts = ExportOptions {
            include_summary: false,
            include_projects: false,
        };
        let h = headings(&build_blocks(&r, &opts).unwrap());
        assert!(!h.contains(&"PROFESSIONAL SUMMARY"));
        assert!(!h.contains(&"PROJECTS"));
    }

    #[test]
    fn test_blank_name_is_empty_resume() {
        let mut r = resume();
        r.personal_info.name = "  ".to_string();
        assert!(matches!(
            build_blocks(&r, &ExportOptions::default()),
            Err(AppError::EmptyResume)
        ));
    }
}
