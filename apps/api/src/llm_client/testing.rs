//! Canned `ResumeModel` for handler and pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{LlmError, ResumeModel};

pub enum StubReply {
    Text(String),
    Status(u16, String),
}

pub struct StubModel {
    reply: StubReply,
    calls: AtomicUsize,
}

impl StubModel {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: StubReply::Text(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            reply: StubReply::Status(status, message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResumeModel for StubModel {
    async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Text(text) => Ok(text.clone()),
            StubReply::Status(status, message) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// A well-formed model reply for "Jane Doe", wrapped in prose and a fence.
pub fn fenced_resume_reply() -> String {
    let json = serde_json::json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "profile_summary": "Backend engineer who ships reliable services.",
        "education": [
            {"degree": "B.S. in Computer Science", "institution": "State University", "year": "2020"}
        ],
        "skills": ["Rust", "PostgreSQL", "Docker"],
        "projects": [
            {"name": "ResumeCraft", "details": ["Generated PDF resumes from notes"]}
        ],
        "experience": []
    });
    format!(
        "Here is the structured resume:\n```json\n{}\n```\nLet me know if you need changes.",
        serde_json::to_string_pretty(&json).unwrap_or_default()
    )
}
