// Cross-cutting prompt fragments. Section templates live in generation/prompts.rs.

/// Appended to every system prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "Always respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Shared grounding rules: the model may reframe, never invent.
pub const GROUNDING_INSTRUCTION: &str = "\
- Only use facts that appear in the existing content above
- Do NOT invent employers, products, systems, clients or metrics that are not already present
- Keep the industry context authentic; do not insert target-role keywords that do not fit the actual work
- If something does not make sense for this role or company, leave it out";

/// Shared system persona for all resume-writing calls.
pub const RESUME_WRITER_PERSONA: &str = "You are an expert resume writer with strong analytical skills. \
    Think step-by-step about the candidate's ACTUAL background before writing. \
    Ground every statement in their real experience and never over-tailor or fabricate capabilities.";
