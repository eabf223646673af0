// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object. \
    Wrap it in a ```json fenced block. \
    Do NOT include explanations, apologies or any text outside the block.";

/// Instruction appended to every generation prompt that restructures user-supplied facts.
pub const FIDELITY_INSTRUCTION: &str = "\
    Use ONLY the facts supplied by the user. Rephrase and organise them professionally, \
    but do NOT invent employers, degrees, dates, metrics or technologies.";
