use std::sync::Arc;

use crate::llm_client::ResumeModel;
use crate::render::PdfFont;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text-generation backend. `LlmClient` in production, a stub in tests.
    pub model: Arc<dyn ResumeModel>,
    /// Per-session generation state; the latest resume per session lives here.
    pub sessions: SessionStore,
    /// Embedded in generated PDFs when configured; Helvetica otherwise.
    pub pdf_font: Option<PdfFont>,
}

impl AppState {
    pub fn new(model: Arc<dyn ResumeModel>) -> Self {
        Self {
            model,
            sessions: SessionStore::new(),
            pdf_font: None,
        }
    }

    pub fn with_pdf_font(mut self, font: PdfFont) -> Self {
        self.pdf_font = Some(font);
        self
    }
}
