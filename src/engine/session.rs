//! Search session state.
//!
//! The orchestrator owns a [`SessionState`] and is its only writer. Anything
//! rendering the session sees it through immutable [`SessionSnapshot`]s
//! delivered to a [`SessionObserver`] after every transition.

use crate::engine::orchestrator::OrchestrationError;
use crate::validation::ValidationError;
use crate::LookupResult;
use serde::{Serialize, Serializer};

/// Session-level error shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
}

impl Serialize for SessionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Mutable state of the current session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Raw input as submitted, never normalized
    pub email: String,
    pub is_searching: bool,
    pub results: Vec<LookupResult>,
    pub error: Option<SessionError>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the searching state: flag set, error and results cleared
    pub fn begin_search(&mut self) {
        self.is_searching = true;
        self.error = None;
        self.results.clear();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            email: self.email.clone(),
            is_searching: self.is_searching,
            results: self.results.clone(),
            error: self.error.clone(),
        }
    }
}

/// Immutable copy of the session handed to observers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub email: String,
    pub is_searching: bool,
    pub results: Vec<LookupResult>,
    pub error: Option<SessionError>,
}

impl SessionSnapshot {
    /// The submit trigger is inert while a search is in flight
    pub fn can_submit(&self) -> bool {
        !self.is_searching
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

/// Receiver of session transitions.
pub trait SessionObserver: Send + Sync {
    fn on_state_change(&self, snapshot: &SessionSnapshot);
}
