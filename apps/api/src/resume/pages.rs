//! The browser-facing form and result pages.
//!
//! Failures never leave the page: they are rendered inline above the refilled
//! form, with the raw model text when the output could not be parsed.

use askama::Template;
use axum::{
    extract::{rejection::FormRejection, Query, State},
    response::Html,
    Form,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::TemplateChoice;
use crate::resume::handlers::{pdf_url, preview_url, submit, SessionQuery};
use crate::resume::models::ResumeRequest;
use crate::state::AppState;

pub struct TemplateOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn template_options(selected: TemplateChoice) -> Vec<TemplateOption> {
    TemplateChoice::ALL
        .iter()
        .map(|&choice| TemplateOption {
            value: choice.as_str(),
            label: choice.label(),
            selected: choice == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "pages/index.html")]
struct FormPage {
    form: ResumeRequest,
    templates: Vec<TemplateOption>,
    action: String,
    error: Option<String>,
    raw_output: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/result.html")]
struct ResultPage {
    form: ResumeRequest,
    name: String,
    filename: String,
    preview_html: String,
    pdf_url: String,
    preview_url: String,
    again_action: String,
}

fn form_action(session_id: Option<Uuid>) -> String {
    match session_id {
        Some(id) => format!("/generate?session={id}"),
        None => "/generate".to_string(),
    }
}

fn form_page(
    form: ResumeRequest,
    session_id: Option<Uuid>,
    error: Option<String>,
    raw_output: Option<String>,
) -> Result<Html<String>, AppError> {
    let page = FormPage {
        templates: template_options(form.template),
        form,
        action: form_action(session_id),
        error,
        raw_output,
    };
    Ok(Html(page.render().map_err(crate::render::RenderError::from)?))
}

/// GET /
pub async fn handle_index() -> Result<Html<String>, AppError> {
    form_page(ResumeRequest::default(), None, None, None)
}

/// POST /generate
///
/// Runs the pipeline for a form submission and shows either the preview with
/// a download link, or the form again with the error inline.
pub async fn handle_generate_form(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    form: Result<Form<ResumeRequest>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let Form(request) = match form {
        Ok(form) => form,
        Err(rejection) => {
            let message = AppError::Validation(rejection.body_text()).to_string();
            return form_page(ResumeRequest::default(), query.session, Some(message), None);
        }
    };
    let session_id = query.session.unwrap_or_else(|| state.sessions.create());

    match submit(&state, session_id, request.clone()).await {
        Ok(generated) => {
            let page = ResultPage {
                form: request,
                name: generated.resume.name.clone(),
                filename: generated.filename.clone(),
                preview_html: generated.html.clone(),
                pdf_url: pdf_url(session_id),
                preview_url: preview_url(session_id),
                again_action: form_action(Some(session_id)),
            };
            Ok(Html(page.render().map_err(crate::render::RenderError::from)?))
        }
        Err(e) => {
            let raw_output = e.raw_output().map(str::to_string);
            let message = match &e {
                AppError::UnparsableOutput { message, .. } => message.clone(),
                other => other.to_string(),
            };
            form_page(request, Some(session_id), Some(message), raw_output)
        }
    }
}
