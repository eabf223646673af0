//! Axum route handlers for the Resume API and downloads.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::TemplateChoice;
use crate::resume::generator::generate_resume;
use crate::resume::models::{GeneratedResume, Resume, ResumeRequest};
use crate::session::{GenerationFailure, SessionState, SessionStatus};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// `?session=<uuid>`: resubmits into an existing session.
#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub session: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub session_id: Uuid,
    pub filename: String,
    pub template: TemplateChoice,
    pub accent_color: String,
    pub resume: Resume,
    pub html: String,
    pub pdf_url: String,
    pub preview_url: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

pub fn pdf_url(session_id: Uuid) -> String {
    format!("/resumes/{session_id}/pdf")
}

pub fn preview_url(session_id: Uuid) -> String {
    format!("/resumes/{session_id}/preview")
}

// ────────────────────────────────────────────────────────────────────────────
// Shared submission flow
// ────────────────────────────────────────────────────────────────────────────

/// Runs one submission inside a session: `AwaitingGeneration`, then `Ready`
/// or `Failed`. Used by both the JSON API and the HTML form.
pub async fn submit(
    state: &AppState,
    session_id: Uuid,
    request: ResumeRequest,
) -> Result<Arc<GeneratedResume>, AppError> {
    let pending = state.sessions.begin(session_id, request.clone())?;

    match generate_resume(state.model.as_ref(), state.pdf_font.as_ref(), &request).await {
        Ok(generated) => {
            let generated = Arc::new(generated);
            pending.succeed(Arc::clone(&generated));
            info!(
                "Session {session_id} ready: {} ({} sessions held)",
                generated.filename,
                state.sessions.len()
            );
            Ok(generated)
        }
        Err(e) => {
            pending.fail(GenerationFailure::from_error(&e, request));
            Err(e)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Full pipeline as JSON: form fields in, structured resume plus preview HTML
/// and a PDF download URL out.
pub async fn handle_generate(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    body: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = body.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let session_id = query.session.unwrap_or_else(|| state.sessions.create());
    let generated = submit(&state, session_id, request).await?;

    Ok(Json(GenerateResponse {
        session_id,
        filename: generated.filename.clone(),
        template: generated.template,
        accent_color: generated.accent.to_string(),
        resume: generated.resume.clone(),
        html: generated.html.clone(),
        pdf_url: pdf_url(session_id),
        preview_url: preview_url(session_id),
    }))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let mut response = SessionResponse {
        session_id,
        status: session.status(),
        filename: None,
        error: None,
        raw_output: None,
    };
    match session {
        SessionState::Ready(generated) => response.filename = Some(generated.filename.clone()),
        SessionState::Failed(failure) => {
            response.error = Some(failure.message);
            response.raw_output = failure.raw_output;
        }
        SessionState::Idle | SessionState::AwaitingGeneration(_) => {}
    }

    Ok(Json(response))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

/// GET /resumes/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let generated = state.sessions.ready(session_id)?;
    Ok(Html(generated.html.clone()))
}

/// GET /resumes/:id/pdf
///
/// Serves the PDF as an attachment named after the person.
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let generated = state.sessions.ready(session_id)?;

    let disposition = content_disposition(&generated.filename)?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        generated.pdf.clone(),
    )
        .into_response())
}

/// `attachment` with an ASCII `filename` for old clients and the exact name
/// as RFC 5987 `filename*`.
fn content_disposition(filename: &str) -> Result<HeaderValue, AppError> {
    let fallback = if filename.is_ascii() {
        filename
    } else {
        "Resume.pdf"
    };
    HeaderValue::from_str(&format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    ))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid download filename: {e}")))
}
