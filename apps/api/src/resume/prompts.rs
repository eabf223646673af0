// All LLM prompt constants for resume generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::llm_client::prompts::{FIDELITY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::resume::models::ResumeRequest;

const NOT_PROVIDED: &str = "None provided";

/// System prompt for resume structuring.
pub fn resume_system() -> String {
    format!(
        "You are an expert resume writer and career coach. \
         You turn rough notes about a person's career into a polished, structured resume. {JSON_ONLY_SYSTEM}"
    )
}

/// Resume structuring prompt template.
/// Replace: {fidelity_instruction}, {target_role}, {name}, {email},
///          {education}, {skills}, {projects}, {experience}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Create a professional resume tailored for the role of "{target_role}".

{fidelity_instruction}

CANDIDATE DETAILS:
Name: {name}
Email: {email}

Education:
{education}

Skills:
{skills}

Projects:
{projects}

Work experience:
{experience}

Return a JSON object with EXACTLY this schema:
{
  "name": "string",
  "email": "string",
  "profile_summary": "2-3 sentence summary aimed at the target role",
  "education": [
    {"degree": "string", "institution": "string", "year": "string"}
  ],
  "skills": ["string"],
  "projects": [
    {"name": "string", "details": ["one achievement-focused bullet per entry"]}
  ],
  "experience": [
    {"title": "string", "company": "string", "duration": "string", "details": ["string"]}
  ]
}

RULES:
1. Every list must be a JSON array, even with a single item
2. Education entries must be objects, never plain strings
3. Order skills by relevance to "{target_role}"
4. If no work experience is provided, return "experience": []
5. Start every detail bullet with a strong action verb"#;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// Fills the template with the submitted form. Blank optional sections read
/// "None provided" so the model does not hallucinate them.
///
/// Substitution is a single pass over the template, so braces typed into a
/// form field reach the model verbatim. Unknown `{word}` tokens are kept.
pub fn build_resume_prompt(request: &ResumeRequest) -> String {
    let experience = if request.has_experience() {
        request.experience.trim()
    } else {
        NOT_PROVIDED
    };

    placeholder()
        .replace_all(RESUME_PROMPT_TEMPLATE, |caps: &Captures<'_>| {
            let value = match &caps[1] {
                "fidelity_instruction" => FIDELITY_INSTRUCTION,
                "target_role" => request.target_role.trim(),
                "name" => request.name.trim(),
                "email" => request.email.trim(),
                "education" => request.education.trim(),
                "skills" => request.skills.trim(),
                "projects" => request.projects.trim(),
                "experience" => experience,
                _ => return caps[0].to_string(),
            };
            value.to_string()
        })
        .into_owned()
}
