//! Scripted `LlmProvider` for tests. Records every request and answers from a closure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{CompletionRequest, LlmError, LlmProvider};

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync>;

pub struct ScriptedLlm {
    responder: Responder,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn new(
        responder: impl Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every section prompt with well-formed output of the requested size.
    pub fn resume_writer() -> Self {
        Self::new(|req| Ok(well_formed_response(&req.prompt)))
    }

    /// Never answers within any reasonable timeout.
    pub fn hanging() -> Self {
        let mut llm = Self::resume_writer();
        llm.delay = Some(Duration::from_secs(3600));
        llm
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(
        &self,
        _api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(request)
    }
}

/// Number following `marker` in the prompt, e.g. "Write exactly 4".
pub fn requested_count(prompt: &str, marker: &str) -> usize {
    prompt
        .find(marker)
        .map(|pos| &prompt[pos + marker.len()..])
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

pub fn well_formed_response(prompt: &str) -> String {
    if prompt.contains("Analyze this job description") {
        return r#"{"required_skills": ["Python"], "soft_skills": ["Communication"],
            "experience_years": 3, "responsibilities": ["Build APIs"],
            "nice_to_have": [], "culture_keywords": ["ownership"]}"#
            .to_string();
    }
    if prompt.contains("CANDIDATE STORY") {
        return r#"{"why_you_want_to_work_here": "Because it fits.", "cover_letter": "Dear team,"}"#
            .to_string();
    }
    if prompt.contains("resume bullets") {
        let n = requested_count(prompt, "Write exactly ");
        let bullets: Vec<String> = (1..=n).map(|i| format!("Delivered outcome {i}")).collect();
        return serde_json::json!({ "bullets": bullets, "skills": ["Python", "SQL"] }).to_string();
    }
    if prompt.contains("resume project entry") {
        let n = requested_count(prompt, "Exactly ");
        let achievements: Vec<String> = (1..=n).map(|i| format!("Shipped feature {i}")).collect();
        return serde_json::json!({
            "description": "A tailored project description.",
            "achievements": achievements,
        })
        .to_string();
    }
    "Backend-leaning engineer with a record of shipping reliable services.".to_string()
}
