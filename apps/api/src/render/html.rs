//! HTML rendering of a `Resume` through askama templates.
//!
//! Templates live in `templates/resume/`. Askama escapes every interpolated
//! value, so model output cannot inject markup into the preview.

use askama::Template;

use crate::render::{AccentColor, RenderError, TemplateChoice};
use crate::resume::models::Resume;

#[derive(Template)]
#[template(path = "resume/classic.html")]
struct ClassicResume<'a> {
    resume: &'a Resume,
    accent: &'a str,
}

#[derive(Template)]
#[template(path = "resume/modern.html")]
struct ModernResume<'a> {
    resume: &'a Resume,
    accent: &'a str,
}

#[derive(Template)]
#[template(path = "resume/compact.html")]
struct CompactResume<'a> {
    resume: &'a Resume,
    accent: &'a str,
}

/// Renders the resume with the chosen layout and accent colour.
pub fn render_html(
    resume: &Resume,
    template: TemplateChoice,
    accent: &AccentColor,
) -> Result<String, RenderError> {
    let accent = accent.as_str();
    let html = match template {
        TemplateChoice::Classic => ClassicResume { resume, accent }.render()?,
        TemplateChoice::Modern => ModernResume { resume, accent }.render()?,
        TemplateChoice::Compact => CompactResume { resume, accent }.render()?,
    };
    Ok(html)
}
