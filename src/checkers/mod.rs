//! Lookup checkers.
//!
//! Every checker answers for exactly one external service through the
//! [`Checker`] capability:
//! - Mock: fixed answers after a simulated delay
//! - Breach: live query against the Have I Been Pwned v3 API
//! - Avatar: deterministic Gravatar link derived from the email hash
//! - Redirect: static search URLs for manual follow-up
//!
//! # Failure contract
//!
//! Checkers never substitute their own failures. Transport errors,
//! unexpected statuses and undecodable bodies are returned as
//! [`CheckerError`]; the orchestrator turns them into a negative
//! [`LookupResult`] for that service and keeps going.

pub mod breach;
pub mod gravatar;
pub mod mock;
pub mod redirect;

use crate::LookupResult;
use async_trait::async_trait;
use std::fmt;

/// Lookup logic for one external service.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Display name used in results, including substituted ones
    fn service(&self) -> &str;

    /// Look `email` up. The email has already passed shape validation but
    /// is otherwise raw user input.
    async fn check(&self, email: &str) -> Result<LookupResult, CheckerError>;
}

/// Kind of checker, used for listing and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckerKind {
    /// Fixed mocked answer
    Mock,
    /// Live breach-database query
    Breach,
    /// Deterministic hash-derived link
    Avatar,
    /// Manual search link, no verification
    Redirect,
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckerKind::Mock => write!(f, "Mock"),
            CheckerKind::Breach => write!(f, "Breach"),
            CheckerKind::Avatar => write!(f, "Avatar"),
            CheckerKind::Redirect => write!(f, "Redirect"),
        }
    }
}

/// Failure of a single checker invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckerError {
    /// Connection, TLS or I/O failure
    #[error("erreur de connexion : {0}")]
    Transport(String),
    /// No answer within the configured timeout
    #[error("pas de réponse après {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// The service answered with a status the checker does not understand
    #[error("statut HTTP inattendu {0}")]
    UnexpectedStatus(u16),
    /// The response body could not be decoded
    #[error("réponse illisible : {0}")]
    Decode(String),
    /// The checker needs an API key and none is configured
    #[error("aucune clé d'API configurée")]
    MissingApiKey,
    /// The checker panicked or was cancelled
    #[error("vérification interrompue")]
    Aborted,
}

impl CheckerError {
    /// Whether the failure came from the remote service or the network,
    /// as opposed to the checker itself
    pub fn is_service_error(&self) -> bool {
        !matches!(self, CheckerError::Aborted)
    }
}

impl From<reqwest::Error> for CheckerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CheckerError::Decode(e.to_string())
        } else {
            CheckerError::Transport(e.to_string())
        }
    }
}
