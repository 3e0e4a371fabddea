//! Job analysis: extracts structured requirements from a raw job description.
//!
//! The result is attached to the tailored resume as metadata; it does not feed
//! back into the section prompts.

use std::time::Duration;

use crate::errors::AppError;
use crate::generation::generator::{call_llm, malformed, CallLimits, Section};
use crate::generation::prompt_builder::build_job_analysis_prompt;
use crate::llm_client::{extract_json, LlmProvider};
use crate::profiles::models::JobAnalysis;

const JOB_ANALYSIS_LIMITS: CallLimits = CallLimits::new(2000, 0.3);

pub async fn analyze_job(
    llm: &dyn LlmProvider,
    api_key: &str,
    job_description: &str,
    timeout: Duration,
) -> Result<JobAnalysis, AppError> {
    let section = Section::JobAnalysis;
    let prompt = build_job_analysis_prompt(job_description);
    let text = call_llm(llm, api_key, section, prompt, JOB_ANALYSIS_LIMITS, timeout).await?;
    parse_job_analysis(&text)
}

fn parse_job_analysis(text: &str) -> Result<JobAnalysis, AppError> {
    let mut analysis: JobAnalysis =
        extract_json(text).map_err(|e| malformed(Section::JobAnalysis, e))?;

    for list in [
        &mut analysis.required_skills,
        &mut analysis.soft_skills,
        &mut analysis.responsibilities,
        &mut analysis.nice_to_have,
        &mut analysis.culture_keywords,
    ] {
        list.retain(|item| !item.trim().is_empty());
    }
    analysis.experience_years = analysis.experience_years.trim().to_string();
    Ok(analysis)
}
