/// LLM Client: the single point of entry for all provider calls.
///
/// No other module talks to the Anthropic API directly; generation code depends on
/// the `LlmProvider` trait so tests can script responses.
///
/// Calls are never retried here. A failed call fails its section and the user resubmits.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
pub mod fake;
pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
/// Transport-level ceiling. Generation applies its own, usually tighter, per-call timeout.
const HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One text-completion call: system instruction, user prompt and sampling limits.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Opaque text-completion service. `LlmClient` is the production implementation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, api_key: &str, request: &CompletionRequest)
        -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client. The API key is supplied per call so the
/// credential store stays the only owner of that secret.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
}

impl LlmClient {
    pub fn new() -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()?,
        })
    }
}

#[async_trait]
impl LlmProvider for LlmClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: &request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        llm_response
            .text()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Deserializes a JSON object out of free-form model output.
///
/// Accepts bare JSON, JSON wrapped in code fences, or JSON surrounded by prose
/// (the outermost `{ ... }` span is tried last).
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let stripped = strip_json_fences(text);
    match serde_json::from_str(stripped) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let span = stripped
                .find('{')
                .zip(stripped.rfind('}'))
                .filter(|(start, end)| start < end)
                .map(|(start, end)| &stripped[start..=end]);
            match span {
                Some(candidate) => serde_json::from_str(candidate).map_err(LlmError::Parse),
                None => Err(LlmError::Parse(first_err)),
            }
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
