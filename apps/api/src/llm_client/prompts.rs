// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Scoring scale shared by every rubric the coach sends out.
pub const SCORE_SCALE_INSTRUCTION: &str = "\
    Every score is a number from 0 to 10 with at most one decimal place. \
    0 means absent or unusable, 5 means adequate, 10 means exceptional. \
    Do NOT inflate scores to be polite.";
