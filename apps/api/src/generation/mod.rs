// Resume generation: prompt construction, per-section LLM calls, job analysis,
// story generation and the history log of generated resumes.
// All LLM calls go through llm_client; nothing here talks to the provider directly.

pub mod generator;
pub mod handlers;
pub mod history;
pub mod job_analysis;
pub mod prompt_builder;
pub mod prompts;
pub mod story;
