//! Per-browser session state as an explicit state machine.
//!
//! ```text
//! Idle | Ready | Failed ──begin──▶ AwaitingGeneration ──succeed──▶ Ready
//!                                          │
//!                                          └──fail / drop──▶ Failed
//! ```
//!
//! Sessions live in memory only and are evicted oldest-first once
//! `MAX_SESSIONS` is reached.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::models::{GeneratedResume, ResumeRequest};

pub const MAX_SESSIONS: usize = 256;

const INTERRUPTED_MESSAGE: &str =
    "Generation was interrupted before it finished. Please submit the form again.";

#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    AwaitingGeneration(ResumeRequest),
    Ready(Arc<GeneratedResume>),
    Failed(GenerationFailure),
}

/// What the user sees after a failed submission.
#[derive(Debug, Clone)]
pub struct GenerationFailure {
    pub message: String,
    /// Verbatim model text when the output could not be parsed.
    pub raw_output: Option<String>,
    /// The submission that failed, so the form can be refilled.
    pub request: ResumeRequest,
}

impl GenerationFailure {
    pub fn from_error(error: &AppError, request: ResumeRequest) -> Self {
        let message = match error {
            AppError::UnparsableOutput { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            message,
            raw_output: error.raw_output().map(str::to_string),
            request,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    AwaitingGeneration,
    Ready,
    Failed,
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::AwaitingGeneration(_) => SessionStatus::AwaitingGeneration,
            SessionState::Ready(_) => SessionStatus::Ready,
            SessionState::Failed(_) => SessionStatus::Failed,
        }
    }
}

#[derive(Default)]
struct Sessions {
    states: HashMap<Uuid, SessionState>,
    /// Insertion order, oldest first.
    order: VecDeque<Uuid>,
}

impl Sessions {
    fn insert(&mut self, id: Uuid, state: SessionState) {
        if self.states.insert(id, state).is_none() {
            self.order.push_back(id);
        }
        while self.states.len() > MAX_SESSIONS {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if self.states.remove(&oldest).is_some() {
                debug!("Evicted session {oldest}");
            }
        }
    }
}

/// In-memory session table shared by all handlers.
///
/// Critical sections never span an `.await`, so a std `Mutex` is enough and
/// lets the pending-generation guard settle state from `Drop`.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<Sessions>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a fresh `Idle` session.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().insert(id, SessionState::Idle);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<SessionState> {
        self.lock().states.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().states.len()
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.lock();
        sessions.order.retain(|existing| *existing != id);
        sessions.states.remove(&id).is_some()
    }

    /// Moves the session into `AwaitingGeneration`. Unknown ids start a new
    /// session. Fails with `Conflict` if a generation is already running.
    pub fn begin(&self, id: Uuid, request: ResumeRequest) -> Result<PendingGeneration, AppError> {
        let mut sessions = self.lock();
        if matches!(
            sessions.states.get(&id),
            Some(SessionState::AwaitingGeneration(_))
        ) {
            return Err(AppError::Conflict(
                "A resume is already being generated for this session".to_string(),
            ));
        }
        sessions.insert(id, SessionState::AwaitingGeneration(request));

        Ok(PendingGeneration {
            store: self.clone(),
            id,
            settled: false,
        })
    }

    /// The finished resume for a session, if it is `Ready`.
    pub fn ready(&self, id: Uuid) -> Result<Arc<GeneratedResume>, AppError> {
        match self.get(id) {
            Some(SessionState::Ready(generated)) => Ok(generated),
            Some(_) => Err(AppError::NotFound(format!(
                "Session {id} has no generated resume"
            ))),
            None => Err(AppError::NotFound(format!("Session {id} not found"))),
        }
    }

    fn settle(&self, id: Uuid, state: SessionState) {
        self.lock().insert(id, state);
    }
}

/// Proof that a session is `AwaitingGeneration`. Consumed by `succeed` or
/// `fail`; dropping it unsettled (e.g. the client disconnected mid-request)
/// marks the session `Failed` so it never stays stuck.
pub struct PendingGeneration {
    store: SessionStore,
    id: Uuid,
    settled: bool,
}

impl PendingGeneration {
    pub fn succeed(mut self, generated: Arc<GeneratedResume>) {
        self.store.settle(self.id, SessionState::Ready(generated));
        self.settled = true;
    }

    pub fn fail(mut self, failure: GenerationFailure) {
        self.store.settle(self.id, SessionState::Failed(failure));
        self.settled = true;
    }
}

impl Drop for PendingGeneration {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut sessions = self.store.lock();
        let request = match sessions.states.get(&self.id) {
            Some(SessionState::AwaitingGeneration(request)) => request.clone(),
            _ => return,
        };
        warn!("Generation for session {} dropped before completion", self.id);
        let failure = GenerationFailure {
            message: INTERRUPTED_MESSAGE.to_string(),
            raw_output: None,
            request,
        };
        sessions.insert(self.id, SessionState::Failed(failure));
    }
}
