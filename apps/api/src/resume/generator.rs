//! Resume Generation: orchestrates one submission end to end.
//!
//! Flow: validate → build prompt → model call → extract JSON → parse →
//!       repair → render HTML → render PDF → suggest filename.
//!
//! Every failure is terminal for the submission; nothing here retries.

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::ResumeModel;
use crate::render::{render_html, render_pdf, PdfFont};
use crate::resume::extract::extract_json;
use crate::resume::models::{GeneratedResume, Resume, ResumeRequest};
use crate::resume::prompts::{build_resume_prompt, resume_system};
use crate::resume::repair::repair;

/// Runs the full pipeline for one form submission. `pdf_font` replaces the
/// built-in PDF fonts when set.
pub async fn generate_resume(
    model: &dyn ResumeModel,
    pdf_font: Option<&PdfFont>,
    request: &ResumeRequest,
) -> Result<GeneratedResume, AppError> {
    // Step 1: Validate
    let accent = request.validate()?;

    // Step 2: Model call
    info!(
        "Generating {} resume for target role {:?}",
        request.template.as_str(),
        request.target_role
    );
    let prompt = build_resume_prompt(request);
    let raw_output = model.complete(&prompt, &resume_system()).await?;

    // Steps 3-4: Extract, parse, repair
    let mut resume = parse_model_output(&raw_output)?;
    fill_identity(&mut resume, request);

    // Step 5: Render
    let html = render_html(&resume, request.template, &accent)?;

    let pdf = {
        let resume = resume.clone();
        let accent = accent.clone();
        let font = pdf_font.cloned();
        tokio::task::spawn_blocking(move || render_pdf(&resume, &accent, font.as_ref()))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF render task failed: {e}")))??
    };

    // Step 6: Filename
    let filename = resume_filename(&resume.name);
    info!(
        "Generated resume {} ({} bytes of PDF, {} skills, {} projects)",
        filename,
        pdf.len(),
        resume.skills.len(),
        resume.projects.len()
    );

    Ok(GeneratedResume {
        resume,
        html,
        pdf,
        filename,
        template: request.template,
        accent,
    })
}

/// Reads a `Resume` out of free-form model text.
///
/// Fails with `UnparsableOutput` carrying the raw text when no JSON object can
/// be found or the extracted text is not valid JSON. Shape problems inside
/// valid JSON are repaired, never rejected.
pub fn parse_model_output(raw_output: &str) -> Result<Resume, AppError> {
    let json_text = extract_json(raw_output).ok_or_else(|| {
        warn!("Model output contained no JSON object ({} chars)", raw_output.len());
        AppError::UnparsableOutput {
            message: "The model response did not contain a JSON object. Please try again."
                .to_string(),
            raw_output: raw_output.to_string(),
        }
    })?;

    let value: Value =
        serde_json::from_str(json_text).map_err(|e| AppError::UnparsableOutput {
            message: format!("The model returned malformed JSON ({e}). Please try again."),
            raw_output: raw_output.to_string(),
        })?;

    Ok(repair(value))
}

/// The form is the source of truth for who the resume belongs to; model
/// values are only kept when the form left them blank.
fn fill_identity(resume: &mut Resume, request: &ResumeRequest) {
    let name = request.name.trim();
    if !name.is_empty() {
        resume.name = name.to_string();
    }
    let email = request.email.trim();
    if !email.is_empty() {
        resume.email = email.to_string();
    }
}

/// Suggested download name: "Jane Doe" → "Jane_Doe_Resume.pdf".
///
/// Whitespace runs become `_`; anything but letters, digits, `-` and `_` is
/// dropped, so no path separators or quotes survive. Letters outside ASCII
/// are kept; the download header carries them RFC 5987-encoded.
pub fn resume_filename(name: &str) -> String {
    let stem = name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        "Resume.pdf".to_string()
    } else {
        format!("{stem}_Resume.pdf")
    }
}
