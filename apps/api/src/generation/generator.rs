//! Resume Generation: one LLM call per section, joined all-or-nothing.
//!
//! Flow: validate request → require credential → build one job per section →
//!       run jobs with bounded concurrency → parse each → merge into a copy of the profile.
//!
//! A single failing section aborts the whole request; in-flight calls are dropped
//! and no partial resume is ever returned.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::job_analysis::analyze_job;
use crate::generation::prompt_builder::{build_prompt, PromptText, SectionInput};
use crate::llm_client::{extract_json, CompletionRequest, LlmError, LlmProvider};
use crate::profiles::models::{JobAnalysis, Profile, TailoredResume};

/// Bullets requested when an experience entry has none of its own.
const DEFAULT_EXPERIENCE_BULLETS: usize = 4;
/// Achievements requested when a project has none of its own.
const DEFAULT_PROJECT_ACHIEVEMENTS: usize = 3;
const MAX_REQUESTED_BULLETS: usize = 10;
/// Upper bound on summary length, in sentences.
const SUMMARY_SENTENCES: usize = 3;
/// Generated bullets longer than this are cut and suffixed with "...".
pub const MAX_BULLET_WORDS: usize = 25;
const MAX_GENERATED_SKILLS: usize = 8;

const SUMMARY_LIMITS: CallLimits = CallLimits::new(800, 0.3);
const EXPERIENCE_LIMITS: CallLimits = CallLimits::new(2500, 0.3);
const PROJECT_LIMITS: CallLimits = CallLimits::new(2000, 0.3);

/// Input for one tailoring run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationRequest {
    pub profile_name: String,
    pub job_description: String,
    #[serde(default)]
    pub extra_knowledge: Option<String>,
    /// Experience index → exact number of bullets wanted for that entry.
    #[serde(default)]
    pub experience_bullet_counts: BTreeMap<usize, usize>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    pub call_timeout: Duration,
    pub concurrency: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(120),
            concurrency: 4,
        }
    }
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        Self {
            call_timeout: config.llm_timeout,
            concurrency: config.generation_concurrency,
        }
    }
}

/// Identifies a unit of generation work in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Experience(usize),
    Project(usize),
    JobAnalysis,
    Story,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Summary => write!(f, "summary"),
            Section::Experience(i) => write!(f, "experience[{i}]"),
            Section::Project(i) => write!(f, "project[{i}]"),
            Section::JobAnalysis => write!(f, "job_analysis"),
            Section::Story => write!(f, "story"),
        }
    }
}

/// Output length and randomness for one completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallLimits {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CallLimits {
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// Fails with `CredentialMissing` unless a non-blank key is present.
pub fn require_credential(api_key: Option<&str>) -> Result<&str, AppError> {
    api_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(AppError::CredentialMissing)
}

/// Runs one completion under the per-call timeout and maps failures to the
/// section-scoped error variants.
pub async fn call_llm(
    llm: &dyn LlmProvider,
    api_key: &str,
    section: Section,
    prompt: PromptText,
    limits: CallLimits,
    timeout: Duration,
) -> Result<String, AppError> {
    let request = CompletionRequest {
        system: prompt.system,
        prompt: prompt.user,
        max_tokens: limits.max_tokens,
        temperature: limits.temperature,
    };

    match tokio::time::timeout(timeout, llm.complete(api_key, &request)).await {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(LlmError::EmptyContent)) => {
            warn!("LLM returned no text for {section}");
            Err(AppError::MalformedOutput {
                section: section.to_string(),
            })
        }
        Ok(Err(e)) => {
            warn!("LLM call for {section} failed: {e}");
            Err(AppError::GenerationFailed {
                section: section.to_string(),
                cause: e.to_string(),
            })
        }
        Err(_) => {
            warn!("LLM call for {section} timed out after {timeout:?}");
            Err(AppError::GenerationTimeout {
                section: section.to_string(),
            })
        }
    }
}

enum SectionJob {
    Summary,
    Experience { index: usize, desired: usize },
    Project { index: usize, desired: usize },
    JobAnalysis,
}

enum SectionOutput {
    Summary(String),
    Experience {
        index: usize,
        bullets: Vec<String>,
        skills: Option<Vec<String>>,
    },
    Project {
        index: usize,
        description: String,
        achievements: Vec<String>,
    },
    JobAnalysis(JobAnalysis),
}

struct RunContext<'a> {
    llm: &'a dyn LlmProvider,
    api_key: &'a str,
    profile: &'a Profile,
    request: &'a GenerationRequest,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ExperienceOutput {
    #[serde(default)]
    bullets: Vec<String>,
    #[serde(default)]
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectOutput {
    #[serde(default)]
    description: String,
    #[serde(default)]
    achievements: Vec<String>,
}

/// Tailors `profile` to the request's job description.
///
/// Returns a resume with the same entries in the same order as the profile; only
/// the summary, experience bullets and project text are rewritten.
pub async fn generate_resume(
    llm: &dyn LlmProvider,
    api_key: Option<&str>,
    settings: &GenerationSettings,
    profile: &Profile,
    request: &GenerationRequest,
) -> Result<TailoredResume, AppError> {
    validate_request(profile, request)?;
    let api_key = require_credential(api_key)?;

    let jobs = plan_jobs(profile, request);
    info!(
        "Generating resume for '{}': {} sections, concurrency {}",
        request.profile_name,
        jobs.len(),
        settings.concurrency
    );

    let ctx = RunContext {
        llm,
        api_key,
        profile,
        request,
        timeout: settings.call_timeout,
    };

    let outputs: Vec<SectionOutput> = stream::iter(jobs.into_iter().map(|job| run_section(&ctx, job)))
        .buffered(settings.concurrency.max(1))
        .try_collect()
        .await?;

    let mut resume = TailoredResume::from_profile(profile);
    for output in outputs {
        merge(&mut resume, output);
    }

    info!("Generated resume for '{}'", request.profile_name);
    Ok(resume)
}

fn validate_request(profile: &Profile, request: &GenerationRequest) -> Result<(), AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }

    for (&index, &count) in &request.experience_bullet_counts {
        if index >= profile.experience.len() {
            return Err(AppError::Validation(format!(
                "Bullet count given for experience {index}, but the profile has {} entries",
                profile.experience.len()
            )));
        }
        if count == 0 || count > MAX_REQUESTED_BULLETS {
            return Err(AppError::Validation(format!(
                "Bullet count for experience {index} must be between 1 and {MAX_REQUESTED_BULLETS}, got {count}"
            )));
        }
    }
    Ok(())
}

fn plan_jobs(profile: &Profile, request: &GenerationRequest) -> Vec<SectionJob> {
    let mut jobs = vec![SectionJob::Summary];

    jobs.extend(profile.experience.iter().enumerate().map(|(index, exp)| {
        let desired = request
            .experience_bullet_counts
            .get(&index)
            .copied()
            .unwrap_or(match exp.description.len() {
                0 => DEFAULT_EXPERIENCE_BULLETS,
                n => n,
            });
        SectionJob::Experience { index, desired }
    }));

    jobs.extend(profile.projects.iter().enumerate().map(|(index, project)| {
        let desired = match project.achievements.len() {
            0 => DEFAULT_PROJECT_ACHIEVEMENTS,
            n => n,
        };
        SectionJob::Project { index, desired }
    }));

    jobs.push(SectionJob::JobAnalysis);
    jobs
}

async fn run_section(ctx: &RunContext<'_>, job: SectionJob) -> Result<SectionOutput, AppError> {
    let jd = ctx.request.job_description.as_str();
    let extra = ctx.request.extra_knowledge.as_deref();

    match job {
        SectionJob::Summary => {
            let section = Section::Summary;
            let prompt = build_prompt(SectionInput::Summary(ctx.profile), jd, extra, SUMMARY_SENTENCES);
            let text = call_llm(ctx.llm, ctx.api_key, section, prompt, SUMMARY_LIMITS, ctx.timeout).await?;
            parse_summary(&text, section).map(SectionOutput::Summary)
        }
        SectionJob::Experience { index, desired } => {
            let section = Section::Experience(index);
            let exp = &ctx.profile.experience[index];
            let prompt = build_prompt(SectionInput::Experience(exp), jd, extra, desired);
            let text = call_llm(ctx.llm, ctx.api_key, section, prompt, EXPERIENCE_LIMITS, ctx.timeout).await?;

            let parsed: ExperienceOutput = extract_json(&text).map_err(|e| malformed(section, e))?;
            let bullets = take_bullets(parsed.bullets, desired, section)?;
            let skills = exp.skills_used.is_empty().then(|| clean_skills(parsed.skills)).filter(|s| !s.is_empty());
            Ok(SectionOutput::Experience {
                index,
                bullets,
                skills,
            })
        }
        SectionJob::Project { index, desired } => {
            let section = Section::Project(index);
            let project = &ctx.profile.projects[index];
            let prompt = build_prompt(SectionInput::Project(project), jd, extra, desired);
            let text = call_llm(ctx.llm, ctx.api_key, section, prompt, PROJECT_LIMITS, ctx.timeout).await?;

            let parsed: ProjectOutput = extract_json(&text).map_err(|e| malformed(section, e))?;
            let description = parsed.description.trim().to_string();
            if description.is_empty() {
                warn!("{section} output has no description");
                return Err(AppError::MalformedOutput {
                    section: section.to_string(),
                });
            }
            let achievements = take_bullets(parsed.achievements, desired, section)?;
            Ok(SectionOutput::Project {
                index,
                description,
                achievements,
            })
        }
        SectionJob::JobAnalysis => analyze_job(ctx.llm, ctx.api_key, jd, ctx.timeout)
            .await
            .map(SectionOutput::JobAnalysis),
    }
}

fn merge(resume: &mut TailoredResume, output: SectionOutput) {
    match output {
        SectionOutput::Summary(summary) => resume.summary = summary,
        SectionOutput::Experience {
            index,
            bullets,
            skills,
        } => {
            if let Some(exp) = resume.experience.get_mut(index) {
                exp.description = bullets;
                if let Some(skills) = skills {
                    exp.skills_used = skills;
                }
            }
        }
        SectionOutput::Project {
            index,
            description,
            achievements,
        } => {
            if let Some(project) = resume.projects.get_mut(index) {
                project.description = description;
                project.achievements = achievements;
            }
        }
        SectionOutput::JobAnalysis(analysis) => resume.job_analysis = Some(analysis),
    }
}

fn parse_summary(text: &str, section: Section) -> Result<String, AppError> {
    let summary = text.trim().trim_matches('"').trim();
    if summary.is_empty() {
        return Err(AppError::MalformedOutput {
            section: section.to_string(),
        });
    }
    Ok(summary.to_string())
}

/// Cleans generated bullets and keeps exactly `desired` of them.
fn take_bullets(raw: Vec<String>, desired: usize, section: Section) -> Result<Vec<String>, AppError> {
    let mut bullets: Vec<String> = raw
        .iter()
        .map(|b| b.trim().trim_start_matches("• ").trim_start_matches("- ").trim())
        .filter(|b| !b.is_empty())
        .map(|b| truncate_words(b, MAX_BULLET_WORDS))
        .collect();

    if bullets.len() < desired {
        warn!(
            "{section} returned {} usable bullets, {desired} requested",
            bullets.len()
        );
        return Err(AppError::MalformedOutput {
            section: section.to_string(),
        });
    }
    bullets.truncate(desired);
    Ok(bullets)
}

fn clean_skills(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_GENERATED_SKILLS)
        .collect()
}

/// Keeps the first `max_words` words, appending "..." when anything was cut.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        words.join(" ")
    } else {
        format!("{}...", words[..max_words].join(" "))
    }
}

pub(crate) fn malformed(section: Section, err: LlmError) -> AppError {
    warn!("Could not parse {section} output: {err}");
    AppError::MalformedOutput {
        section: section.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::{well_formed_response, ScriptedLlm};
    use crate::profiles::models::{ExperienceEntry, PersonalInfo, ProjectEntry};

    const JD: &str = "Looking for a backend engineer with Python experience";
    const KEY: Option<&str> = Some("sk-ant-test-key");

    fn jane() -> Profile {
        Profile {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "j@x.com".to_string(),
                ..Default::default()
            },
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                description: vec!["Did X".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            profile_name: "jane".to_string(),
            job_description: JD.to_string(),
            ..Default::default()
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings {
            call_timeout: Duration::from_secs(5),
            concurrency: 2,
        }
    }

    /// Well-formed answers everywhere except experience prompts, which get `experience`.
    fn with_experience_response(experience: &'static str) -> ScriptedLlm {
        ScriptedLlm::new(move |req| {
            if req.prompt.contains("resume bullets") {
                Ok(experience.to_string())
            } else {
                Ok(well_formed_response(&req.prompt))
            }
        })
    }

    #[tokio::test]
    async fn test_generate_tailors_jane_doe() {
        let llm = ScriptedLlm::resume_writer();
        let profile = jane();

        let resume = generate_resume(&llm, KEY, &settings(), &profile, &request())
            .await
            .unwrap();

        assert_eq!(resume.personal_info, profile.personal_info);
        assert_eq!(resume.experience.len(), 1);
        assert!(!resume.experience[0].description.is_empty());
        assert_eq!(resume.experience[0].title, "Engineer");
        assert!(!resume.summary.is_empty());
        assert_eq!(
            resume.job_analysis.unwrap().required_skills,
            vec!["Python"]
        );
        // summary, one experience, job analysis
        assert_eq!(llm.calls(), 3);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_call() {
        let llm = ScriptedLlm::resume_writer();
        for key in [None, Some("   ")] {
            let err = generate_resume(&llm, key, &settings(), &jane(), &request())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::CredentialMissing));
        }
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_requests_are_rejected_without_calls() {
        let llm = ScriptedLlm::resume_writer();

        let mut empty_jd = request();
        empty_jd.job_description = "  \n".to_string();

        let mut zero = request();
        zero.experience_bullet_counts.insert(0, 0);

        let mut too_many = request();
        too_many.experience_bullet_counts.insert(0, 11);

        let mut unknown = request();
        unknown.experience_bullet_counts.insert(3, 2);

        for req in [empty_jd, zero, too_many, unknown] {
            let err = generate_resume(&llm, KEY, &settings(), &jane(), &req)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
        }
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_requested_bullet_count_is_honoured() {
        let llm = ScriptedLlm::resume_writer();
        let mut req = request();
        req.experience_bullet_counts.insert(0, 5);

        let resume = generate_resume(&llm, KEY, &settings(), &jane(), &req)
            .await
            .unwrap();
        assert_eq!(resume.experience[0].description.len(), 5);

        let experience_prompt = llm
            .requests()
            .into_iter()
            .find(|r| r.prompt.contains("resume bullets"))
            .unwrap();
        assert!(experience_prompt.prompt.contains("Write exactly 5 bullet points"));
        assert_eq!(experience_prompt.max_tokens, 2500);
    }

    #[tokio::test]
    async fn test_entry_without_bullets_defaults_to_four() {
        let llm = ScriptedLlm::resume_writer();
        let mut profile = jane();
        profile.experience[0].description.clear();

        let resume = generate_resume(&llm, KEY, &settings(), &profile, &request())
            .await
            .unwrap();
        assert_eq!(resume.experience[0].description.len(), 4);
    }

    #[tokio::test]
    async fn test_generated_skills_fill_empty_skills_only() {
        let llm = ScriptedLlm::resume_writer();
        let mut profile = jane();
        profile.experience.push(ExperienceEntry {
            title: "Analyst".to_string(),
            company: "Beta".to_string(),
            description: vec!["Wrote reports".to_string()],
            skills_used: vec!["Excel".to_string()],
            ..Default::default()
        });

        let resume = generate_resume(&llm, KEY, &settings(), &profile, &request())
            .await
            .unwrap();
        assert_eq!(resume.experience[0].skills_used, vec!["Python", "SQL"]);
        assert_eq!(resume.experience[1].skills_used, vec!["Excel"]);
    }

    #[tokio::test]
    async fn test_projects_are_rewritten_and_order_preserved() {
        let llm = ScriptedLlm::resume_writer();
        let mut profile = jane();
        profile.projects = vec![
            ProjectEntry {
                name: "Ledger".to_string(),
                achievements: vec!["One".to_string(), "Two".to_string()],
                ..Default::default()
            },
            ProjectEntry {
                name: "Crawler".to_string(),
                ..Default::default()
            },
        ];

        let resume = generate_resume(&llm, KEY, &settings(), &profile, &request())
            .await
            .unwrap();
        assert_eq!(resume.projects[0].name, "Ledger");
        assert_eq!(resume.projects[0].achievements.len(), 2);
        assert_eq!(resume.projects[1].name, "Crawler");
        assert_eq!(resume.projects[1].achievements.len(), 3);
        assert_eq!(
            resume.projects[1].description,
            "A tailored project description."
        );
    }

    #[tokio::test]
    async fn test_unparseable_output_is_malformed() {
        let llm = with_experience_response("I'm sorry, I can't help with that.");
        let err = generate_resume(&llm, KEY, &settings(), &jane(), &request())
            .await
            .unwrap_err();
        match err {
            AppError::MalformedOutput { section } => assert_eq!(section, "experience[0]"),
            other => panic!("expected MalformedOutput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_too_few_bullets_is_malformed() {
        let llm = with_experience_response(r#"{"bullets": ["Only one", "   "]}"#);
        let mut req = request();
        req.experience_bullet_counts.insert(0, 2);

        let err = generate_resume(&llm, KEY, &settings(), &jane(), &req)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn test_extra_bullets_are_dropped_and_long_ones_cut() {
        let llm = with_experience_response(
            r#"{"bullets": [
                "  Led one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen seventeen eighteen nineteen twenty twentyone twentytwo twentythree twentyfour twentyfive twentysix  ",
                "Second",
                "Third"
            ]}"#,
        );
        let mut req = request();
        req.experience_bullet_counts.insert(0, 2);

        let resume = generate_resume(&llm, KEY, &settings(), &jane(), &req)
            .await
            .unwrap();
        let bullets = &resume.experience[0].description;
        assert_eq!(bullets.len(), 2);
        assert!(bullets[0].ends_with("twentyfour..."));
        assert_eq!(bullets[0].split_whitespace().count(), MAX_BULLET_WORDS);
        assert_eq!(bullets[1], "Second");
    }

    #[tokio::test]
    async fn test_provider_error_fails_whole_generation() {
        let llm = ScriptedLlm::new(|req| {
            if req.prompt.contains("resume bullets") {
                Err(LlmError::Api {
                    status: 401,
                    message: "invalid x-api-key".to_string(),
                })
            } else {
                Ok(well_formed_response(&req.prompt))
            }
        });

        let err = generate_resume(&llm, KEY, &settings(), &jane(), &request())
            .await
            .unwrap_err();
        match err {
            AppError::GenerationFailed { section, cause } => {
                assert_eq!(section, "experience[0]");
                assert!(cause.contains("invalid x-api-key"));
            }
            other => panic!("expected GenerationFailed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let llm = ScriptedLlm::hanging();
        let settings = GenerationSettings {
            call_timeout: Duration::from_secs(1),
            concurrency: 4,
        };

        let err = generate_resume(&llm, KEY, &settings, &jane(), &request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GenerationTimeout { .. }));
    }

    #[test]
    fn test_truncate_words_leaves_short_text_alone() {
        assert_eq!(truncate_words("Built  the   thing", 25), "Built the thing");
        assert_eq!(truncate_words("a b c", 2), "a b...");
    }

    #[test]
    fn test_section_names() {
        assert_eq!(Section::Experience(2).to_string(), "experience[2]");
        assert_eq!(Section::Project(0).to_string(), "project[0]");
        assert_eq!(Section::JobAnalysis.to_string(), "job_analysis");
    }

    #[test]
    fn test_request_deserializes_string_index_keys() {
        let req: GenerationRequest = serde_json::from_str(
            r#"{"profile_name": "jane", "job_description": "jd",
                "experience_bullet_counts": {"0": 3, "2": 5}}"#,
        )
        .unwrap();
        assert_eq!(req.experience_bullet_counts.get(&2), Some(&5));
        assert!(req.extra_knowledge.is_none());
    }
}
