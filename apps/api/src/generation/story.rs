//! Story generation: "why I want to work here" and cover letter, written from the
//! profile's free-text story rather than its bullets.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{call_llm, malformed, require_credential, CallLimits, Section};
use crate::generation::prompt_builder::build_story_prompt;
use crate::llm_client::{extract_json, LlmProvider};
use crate::profiles::models::Profile;

/// Narrative output needs more room and more variety than bullets.
const STORY_LIMITS: CallLimits = CallLimits::new(1100, 0.7);

#[derive(Debug, Clone, Deserialize)]
pub struct StoryRequest {
    pub profile_name: String,
    pub job_description: String,
    #[serde(default)]
    pub extra_knowledge: Option<String>,
    #[serde(default = "default_true")]
    pub include_why: bool,
    #[serde(default)]
    pub include_cover_letter: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_you_want_to_work_here: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

pub async fn generate_story(
    llm: &dyn LlmProvider,
    api_key: Option<&str>,
    timeout: Duration,
    profile: &Profile,
    request: &StoryRequest,
) -> Result<StoryContent, AppError> {
    if profile.my_story.trim().is_empty() {
        return Err(AppError::Validation(
            "Profile has no story; add one under my_story first".to_string(),
        ));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }
    if !request.include_why && !request.include_cover_letter {
        return Ok(StoryContent::default());
    }
    let api_key = require_credential(api_key)?;

    let prompt = build_story_prompt(
        profile,
        &request.job_description,
        request.extra_knowledge.as_deref(),
        request.include_why,
        request.include_cover_letter,
    );
    let text = call_llm(llm, api_key, Section::Story, prompt, STORY_LIMITS, timeout).await?;
    let raw: StoryContent = extract_json(&text).map_err(|e| malformed(Section::Story, e))?;

    let content = StoryContent {
        why_you_want_to_work_here: keep_if(request.include_why, raw.why_you_want_to_work_here),
        cover_letter: keep_if(request.include_cover_letter, raw.cover_letter),
    };
    if content == StoryContent::default() {
        return Err(AppError::MalformedOutput {
            section: Section::Story.to_string(),
        });
    }

    info!("Generated story content for '{}'", request.profile_name);
    Ok(content)
}

fn keep_if(requested: bool, value: Option<String>) -> Option<String> {
    value
        .filter(|_| requested)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
