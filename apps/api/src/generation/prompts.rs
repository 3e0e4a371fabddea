// All LLM prompt templates for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.
//
// Every section template walks the model through the same four stages, in order,
// under these exact headers. `prompt_builder` fills the placeholders.

pub const STAGE_CONTEXT: &str = "STEP 1: ANALYZE THE CONTEXT";
pub const STAGE_REASONING: &str = "STEP 2: REASON ABOUT WHAT MAKES SENSE";
pub const STAGE_GROUNDING: &str = "STEP 3: GROUNDING CHECK";
pub const STAGE_OUTPUT: &str = "STEP 4: CREATE OUTPUT";

/// Stage headers in the order they must appear.
pub const STAGE_HEADERS: [&str; 4] = [STAGE_CONTEXT, STAGE_REASONING, STAGE_GROUNDING, STAGE_OUTPUT];

/// Summary prompt. Replace: {name}, {current_summary}, {experience_overview},
/// {technical_skills}, {education}, {grounding_instruction}, {sentence_count},
/// {job_description}, {extra_knowledge}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"You are writing the professional summary for a resume. Think step-by-step and reason carefully.

STEP 1: ANALYZE THE CONTEXT
Candidate: {name}
Current Summary: {current_summary}
Experience:
{experience_overview}
Technical Skills: {technical_skills}
Education: {education}

Target Job Description:
{job_description}

Extra Context:
{extra_knowledge}

STEP 2: REASON ABOUT WHAT MAKES SENSE
Before writing, think through:
1. What does the candidate's actual career path say about their strengths?
2. Which of those strengths does the target job genuinely need?
3. Where would echoing the job description's wording overstate the candidate's background?

STEP 3: GROUNDING CHECK
{grounding_instruction}

STEP 4: CREATE OUTPUT
Write a professional summary of at most {sentence_count} sentences that:
- Highlights the experience and skills relevant to the target job
- Uses keywords from the job description only where they are true of the candidate
- Demonstrates a clear value proposition and stays concise

Return ONLY the summary text as a single paragraph. No heading, no quotes, no JSON."#;

/// Experience prompt. Replace: {title}, {company}, {start_date}, {end_date},
/// {skills_used}, {existing_bullets}, {existing_verbs}, {grounding_instruction},
/// {bullet_count}, {skills_directive}, {output_schema}, {job_description}, {extra_knowledge}
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"You are generating resume bullets. Think step-by-step and reason carefully.

STEP 1: ANALYZE THE CONTEXT
Current Role: {title} at {company}
Work Period: {start_date} - {end_date}
Skills Used: {skills_used}

Existing Responsibilities (your SOURCE OF TRUTH - these are REAL activities):
{existing_bullets}

Action verbs already used: {existing_verbs}

Target Job Description:
{job_description}

Extra Context:
{extra_knowledge}

STEP 2: REASON ABOUT WHAT MAKES SENSE
Before writing bullets, think through:
1. What industry is {company} actually in?
2. What would a {title} REALISTICALLY do in that industry?
3. Which existing responsibilities show capabilities the target job needs?
4. Where would pushing the target job's keywords turn into over-tailoring?

STEP 3: GROUNDING CHECK
{grounding_instruction}
- Do not claim work on projects or systems that do not match {company}

STEP 4: CREATE OUTPUT
Write exactly {bullet_count} bullet points that:
- Each start with a DIFFERENT action verb
- Are factually grounded in the existing responsibilities
- Use terminology appropriate to the industry {company} is actually in
- Are at most 25 words each
{skills_directive}
Return ONLY this JSON object:
{output_schema}"#;

/// Used when the entry lists no skills: the model proposes them alongside the bullets.
pub const EXPERIENCE_SKILLS_DIRECTIVE: &str =
    "Also list 5-8 skills that are authentic to this role AND transferable to the target job.\n";

pub const EXPERIENCE_SCHEMA: &str = r#"{"bullets": ["bullet 1", "bullet 2", ...]}"#;

pub const EXPERIENCE_WITH_SKILLS_SCHEMA: &str =
    r#"{"skills": ["skill 1", "skill 2", ...], "bullets": ["bullet 1", "bullet 2", ...]}"#;

/// Project prompt. Replace: {name}, {description}, {technologies},
/// {existing_achievements}, {grounding_instruction}, {achievement_count},
/// {job_description}, {extra_knowledge}
pub const PROJECT_PROMPT_TEMPLATE: &str = r#"You are tailoring a resume project entry. Think step-by-step and reason carefully.

STEP 1: ANALYZE THE CONTEXT
Project Name: {name}
Existing Description: {description}
Technologies: {technologies}

Existing Achievements (your SOURCE OF TRUTH):
{existing_achievements}

Target Job Description:
{job_description}

Extra Context:
{extra_knowledge}

STEP 2: REASON ABOUT WHAT MAKES SENSE
Before writing, think through:
1. Based on the existing details, what is this project ACTUALLY about?
2. Which parts of it are relevant to the target job?
3. Am I being realistic, or over-tailoring the project to match keywords?

STEP 3: GROUNDING CHECK
{grounding_instruction}
- Do not turn this into a different project just to match the job description
- Achievements must stay proportional to the project's scope

STEP 4: CREATE OUTPUT
Write:
1. A description of 2-3 sentences that stays true to the project
2. Exactly {achievement_count} achievements, each at most 25 words and each starting with a different action verb

Return ONLY this JSON object:
{"description": "description text", "achievements": ["achievement 1", "achievement 2", ...]}"#;

/// Job description analysis. Replace: {job_description}
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this job description and extract:
1. Key technical skills required
2. Soft skills required
3. Years of experience needed
4. Main responsibilities
5. Nice-to-have skills
6. Company culture keywords

Job Description:
{job_description}

Provide the analysis as a JSON object with exactly these keys:
{
    "required_skills": [],
    "soft_skills": [],
    "experience_years": "",
    "responsibilities": [],
    "nice_to_have": [],
    "culture_keywords": []
}"#;

pub const JOB_ANALYSIS_PERSONA: &str =
    "You are an expert resume consultant who analyzes job descriptions.";

pub const STORY_PERSONA: &str =
    "You are an expert career storyteller who writes authentic, tailored narratives.";

/// Story prompt. Replace: {story}, {summary}, {experience_highlights},
/// {outputs_requested}, {job_description}, {extra_knowledge}
pub const STORY_PROMPT_TEMPLATE: &str = r#"You are crafting personalised narratives that feel authentic and compelling.

CANDIDATE STORY (primary source material):
{story}

ADDITIONAL CONTEXT:
- Professional Summary: {summary}
- Experience Highlights:
{experience_highlights}
- Extra Knowledge: {extra_knowledge}

TARGET JOB DESCRIPTION:
{job_description}

OUTPUT REQUIREMENTS:
{outputs_requested}

STRICT RULES:
- Root every paragraph in the candidate's story, motivations and real experience.
- Reference the job's mission, responsibilities and skills only to show genuine alignment.
- Use a confident, professional tone without exaggeration or buzzwords.
- Separate paragraphs with a blank line.
- Include only the keys for the requested outputs.

Return JSON like:
{"why_you_want_to_work_here": "...", "cover_letter": "..."}"#;

pub const STORY_WHY_REQUIREMENT: &str = "- why_you_want_to_work_here: a 3-paragraph narrative explaining why the candidate wants this job, tying motivations from the story to the job description. Each paragraph 3-5 sentences.";

pub const STORY_COVER_LETTER_REQUIREMENT: &str = "- cover_letter: a full professional cover letter (4-5 paragraphs) following introduction, value proposition, evidence, cultural fit and closing.";
