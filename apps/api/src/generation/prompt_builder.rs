//! Prompt Builder: pure, deterministic construction of every generation prompt.
//!
//! Same inputs always produce the same text. The only branching is which template
//! a section kind selects (and, for experience, whether skills are requested too).

use crate::generation::prompts::{
    EXPERIENCE_PROMPT_TEMPLATE, EXPERIENCE_SCHEMA, EXPERIENCE_SKILLS_DIRECTIVE,
    EXPERIENCE_WITH_SKILLS_SCHEMA, JOB_ANALYSIS_PERSONA, JOB_ANALYSIS_PROMPT_TEMPLATE,
    PROJECT_PROMPT_TEMPLATE, STORY_COVER_LETTER_REQUIREMENT, STORY_PERSONA,
    STORY_PROMPT_TEMPLATE, STORY_WHY_REQUIREMENT, SUMMARY_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{
    GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION, RESUME_WRITER_PERSONA,
};
use crate::profiles::models::{ExperienceEntry, Profile, ProjectEntry};

/// How many experience entries the summary and story prompts preview.
const OVERVIEW_ENTRIES: usize = 4;

/// The profile slice a section prompt is built from.
#[derive(Debug, Clone, Copy)]
pub enum SectionInput<'a> {
    Summary(&'a Profile),
    Experience(&'a ExperienceEntry),
    Project(&'a ProjectEntry),
}

/// System instruction plus user prompt, ready for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptText {
    pub system: String,
    pub user: String,
}

/// Builds the prompt for one resume section.
///
/// `desired_count` is the exact bullet (or achievement) count for experience and
/// projects, and the maximum sentence count for the summary.
pub fn build_prompt(
    section: SectionInput<'_>,
    job_description: &str,
    extra_knowledge: Option<&str>,
    desired_count: usize,
) -> PromptText {
    let extra = extra_context(extra_knowledge);
    let count = desired_count.to_string();
    let job_description = job_description.trim();
    match section {
        SectionInput::Summary(profile) => PromptText {
            system: format!("{RESUME_WRITER_PERSONA} Return plain text only."),
            user: fill(
                SUMMARY_PROMPT_TEMPLATE,
                &[
                    ("grounding_instruction", GROUNDING_INSTRUCTION),
                    ("sentence_count", &count),
                    ("name", or_placeholder(&profile.personal_info.name)),
                    ("current_summary", or_placeholder(&profile.summary)),
                    ("experience_overview", &experience_overview(profile)),
                    ("technical_skills", &join_or_placeholder(&profile.skills.technical)),
                    ("education", &education_line(profile)),
                    ("extra_knowledge", &extra),
                    ("job_description", job_description),
                ],
            ),
        },
        SectionInput::Experience(exp) => {
            let needs_skills = exp.skills_used.is_empty();
            let (skills_directive, schema) = if needs_skills {
                (EXPERIENCE_SKILLS_DIRECTIVE, EXPERIENCE_WITH_SKILLS_SCHEMA)
            } else {
                ("", EXPERIENCE_SCHEMA)
            };
            PromptText {
                system: format!(
                    "{RESUME_WRITER_PERSONA} Each bullet MUST start with a different action verb. {JSON_ONLY_INSTRUCTION}"
                ),
                user: fill(
                    EXPERIENCE_PROMPT_TEMPLATE,
                    &[
                        ("grounding_instruction", GROUNDING_INSTRUCTION),
                        ("bullet_count", &count),
                        ("skills_directive", skills_directive),
                        ("output_schema", schema),
                        ("existing_bullets", &bullet_list(&exp.description)),
                        ("existing_verbs", &verbs_line(&exp.description)),
                        ("skills_used", &join_or_placeholder(&exp.skills_used)),
                        ("start_date", or_placeholder(&exp.start_date)),
                        ("end_date", or_placeholder(&exp.end_date)),
                        ("title", &exp.title),
                        ("company", &exp.company),
                        ("extra_knowledge", &extra),
                        ("job_description", job_description),
                    ],
                ),
            }
        }
        SectionInput::Project(project) => PromptText {
            system: format!("{RESUME_WRITER_PERSONA} {JSON_ONLY_INSTRUCTION}"),
            user: fill(
                PROJECT_PROMPT_TEMPLATE,
                &[
                    ("grounding_instruction", GROUNDING_INSTRUCTION),
                    ("achievement_count", &count),
                    ("existing_achievements", &bullet_list(&project.achievements)),
                    ("technologies", &join_or_placeholder(&project.technologies)),
                    ("description", or_placeholder(&project.description)),
                    ("name", &project.name),
                    ("extra_knowledge", &extra),
                    ("job_description", job_description),
                ],
            ),
        },
    }
}

pub fn build_job_analysis_prompt(job_description: &str) -> PromptText {
    PromptText {
        system: format!("{JOB_ANALYSIS_PERSONA} {JSON_ONLY_INSTRUCTION}"),
        user: fill(
            JOB_ANALYSIS_PROMPT_TEMPLATE,
            &[("job_description", job_description.trim())],
        ),
    }
}

pub fn build_story_prompt(
    profile: &Profile,
    job_description: &str,
    extra_knowledge: Option<&str>,
    include_why: bool,
    include_cover_letter: bool,
) -> PromptText {
    let mut requested = Vec::new();
    if include_why {
        requested.push(STORY_WHY_REQUIREMENT);
    }
    if include_cover_letter {
        requested.push(STORY_COVER_LETTER_REQUIREMENT);
    }
    let extra = extra_knowledge
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("None provided");

    PromptText {
        system: format!("{STORY_PERSONA} {JSON_ONLY_INSTRUCTION}"),
        user: fill(
            STORY_PROMPT_TEMPLATE,
            &[
                ("outputs_requested", &requested.join("\n")),
                ("experience_highlights", &experience_overview(profile)),
                ("summary", or_placeholder(&profile.summary)),
                ("story", profile.my_story.trim()),
                ("extra_knowledge", extra),
                ("job_description", job_description.trim()),
            ],
        ),
    }
}

/// Substitutes `{key}` placeholders in one pass over `template`.
///
/// Substituted text is never rescanned, so braces inside profile or job text
/// reach the model verbatim. Braces that do not name a known key are kept.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let found = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match found {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Distinct leading verbs of the existing bullets, in first-seen order.
pub fn existing_verbs(bullets: &[String]) -> Vec<String> {
    let mut verbs: Vec<String> = Vec::new();
    for bullet in bullets {
        let cleaned = bullet.trim_start_matches(['•', '-', ' ']).trim();
        let Some(first) = cleaned.split_whitespace().next() else {
            continue;
        };
        let word = capitalize(first.trim_matches([',', '.', ';', ':']));
        if !word.is_empty() && !verbs.contains(&word) {
            verbs.push(word);
        }
    }
    verbs
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

fn verbs_line(bullets: &[String]) -> String {
    let verbs = existing_verbs(bullets);
    if verbs.is_empty() {
        "None provided".to_string()
    } else {
        verbs.join(", ")
    }
}

fn bullet_list(items: &[String]) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("- {s}"))
        .collect();
    if lines.is_empty() {
        "- None provided".to_string()
    } else {
        lines.join("\n")
    }
}

fn experience_overview(profile: &Profile) -> String {
    if profile.experience.is_empty() {
        return "- No experience entries provided".to_string();
    }
    profile
        .experience
        .iter()
        .take(OVERVIEW_ENTRIES)
        .map(|exp| {
            let preview = exp
                .description
                .iter()
                .take(2)
                .map(|b| b.trim())
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "- {} at {} ({} - {}): {}",
                exp.title,
                exp.company,
                exp.start_date,
                exp.end_date,
                if preview.is_empty() {
                    "No details provided"
                } else {
                    preview.as_str()
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn education_line(profile: &Profile) -> String {
    profile
        .education
        .first()
        .map(|edu| format!("{}, {}", edu.degree, edu.institution))
        .unwrap_or_else(|| "None provided".to_string())
}

fn extra_context(extra_knowledge: Option<&str>) -> String {
    match extra_knowledge.map(str::trim).filter(|s| !s.is_empty()) {
        Some(extra) => format!("- {extra}"),
        None => "- No additional context provided".to_string(),
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        "None provided"
    } else {
        value.trim()
    }
}

fn join_or_placeholder(items: &[String]) -> String {
    if items.is_empty() {
        "None provided".to_string()
    } else {
        items.join(", ")
    }
}
