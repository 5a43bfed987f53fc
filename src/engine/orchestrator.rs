//! Lookup orchestrator.
//!
//! Owns the session state and the ordered checker registry, and runs one
//! search per submit.
//!
//! # Graceful Degradation
//!
//! This module contains failures at the narrowest scope:
//! - Checker error: substituted by a negative result for that service
//! - Checker timeout: substituted with a service-error detail
//! - Checker panic: caught at the task boundary, substituted as incomplete
//! - Assembly failure: generic session error, searching flag still cleared
//! - Dropped submit future: searching flag cleared and checker task aborted
//!
//! Checkers run strictly one after another in registration order. The
//! presentation layer keys results by position, so order is part of the
//! contract. No function in this module will panic.

use crate::checkers::breach::{BreachChecker, BreachConfig};
use crate::checkers::gravatar::GravatarChecker;
use crate::checkers::mock::default_mocks;
use crate::checkers::redirect::default_redirectors;
use crate::checkers::{Checker, CheckerError, CheckerKind};
use crate::config::MailTraceConfig;
use crate::engine::session::{SessionError, SessionObserver, SessionSnapshot, SessionState};
use crate::validation::validate_email;
use crate::{LookupProfile, LookupResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Prefix of every detail produced for a failed external service
pub const SERVICE_ERROR_PREFIX: &str = "Erreur du service";

/// Detail for a checker that stopped without an answer
pub const INCOMPLETE_CHECK_DETAILS: &str = "La vérification n'a pas pu aboutir";

/// Failure outside any single checker.
///
/// Every variant shows the same generic message to the user; the variant
/// itself is what gets logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrchestrationError {
    #[error("Une erreur est survenue pendant la recherche")]
    MissingService { position: usize },
    #[error("Une erreur est survenue pendant la recherche")]
    ResultCountMismatch { expected: usize, actual: usize },
}

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Per-checker timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig { timeout_ms: 10000 }
    }
}

impl From<&MailTraceConfig> for OrchestratorConfig {
    fn from(config: &MailTraceConfig) -> Self {
        OrchestratorConfig {
            timeout_ms: config.timeout_ms,
        }
    }
}

/// A registered checker with its listing metadata
pub struct RegisteredChecker {
    pub id: String,
    pub kind: CheckerKind,
    pub description: String,
    pub checker: Arc<dyn Checker>,
}

impl RegisteredChecker {
    pub fn new(id: impl Into<String>, kind: CheckerKind, description: impl Into<String>, checker: Arc<dyn Checker>) -> Self {
        RegisteredChecker {
            id: id.into(),
            kind,
            description: description.into(),
            checker,
        }
    }

    pub fn service(&self) -> &str {
        self.checker.service()
    }
}

/// Lookup orchestrator
pub struct LookupOrchestrator {
    config: OrchestratorConfig,
    checkers: Vec<RegisteredChecker>,
    session: SessionState,
    observers: Vec<Arc<dyn SessionObserver>>,
}

/// Clears the searching flag however the search ends, including when the
/// submit future is dropped mid-search.
struct InFlight<'a> {
    session: &'a mut SessionState,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.is_searching = false;
    }
}

/// Aborts the spawned checker when dropped, so a cancelled search does not
/// leave requests running behind it. Aborting a finished task is a no-op.
struct CheckerTask<T>(JoinHandle<T>);

impl<T> Drop for CheckerTask<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl LookupOrchestrator {
    /// Create a new orchestrator with the given configuration
    pub fn new(config: OrchestratorConfig) -> Self {
        LookupOrchestrator {
            config,
            checkers: Vec::new(),
            session: SessionState::new(),
            observers: Vec::new(),
        }
    }

    /// Register checkers for execution, after any already registered
    pub fn register_checkers(&mut self, checkers: Vec<RegisteredChecker>) {
        self.checkers.extend(checkers);
    }

    /// Register a single checker
    pub fn register_checker(&mut self, checker: RegisteredChecker) {
        self.checkers.push(checker);
    }

    /// Subscribe to session transitions
    pub fn add_observer(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Registered checkers in execution order
    pub fn checkers(&self) -> &[RegisteredChecker] {
        &self.checkers
    }

    /// Current session state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Run one search for `email`.
    ///
    /// Inert while a search is in flight. Invalid input sets the session error and leaves previous results in
    /// place. Valid input clears the previous outcome, runs every checker in
    /// order and replaces the results in one assignment.
    pub async fn submit(&mut self, email: &str) -> SessionSnapshot {
        if self.session.is_searching {
            debug!("submit ignored, search in flight");
            return self.snapshot();
        }

        self.session.email = email.to_string();

        if let Err(e) = validate_email(email) {
            debug!(error = %e, "rejected email input");
            self.session.error = Some(SessionError::Validation(e));
            self.publish();
            return self.snapshot();
        }

        self.session.begin_search();
        self.publish();

        let start = Instant::now();
        let timeout = Duration::from_millis(self.config.timeout_ms);
        {
            let guard = InFlight {
                session: &mut self.session,
            };

            let collected = run_sequence(&self.checkers, email, timeout).await;
            match assemble(collected, self.checkers.len()) {
                Ok(results) => guard.session.results = results,
                Err(e) => {
                    warn!(error = ?e, "search failed outside checker isolation");
                    guard.session.error = Some(SessionError::Orchestration(e));
                }
            }
        }

        info!(
            checkers = self.checkers.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "search completed"
        );
        self.publish();
        self.snapshot()
    }

    fn publish(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.session.snapshot();
        for observer in &self.observers {
            observer.on_state_change(&snapshot);
        }
    }
}

/// Run every checker in order, awaiting each before starting the next
async fn run_sequence(checkers: &[RegisteredChecker], email: &str, timeout: Duration) -> Vec<LookupResult> {
    let mut results = Vec::with_capacity(checkers.len());
    for registered in checkers {
        results.push(execute_checker(registered, email, timeout).await);
    }
    results
}

/// Execute a single checker with timeout and panic isolation
async fn execute_checker(registered: &RegisteredChecker, email: &str, timeout: Duration) -> LookupResult {
    let start = Instant::now();
    debug!(id = %registered.id, service = registered.service(), "checker started");

    let checker = Arc::clone(&registered.checker);
    let owned_email = email.to_string();
    let mut task = CheckerTask(tokio::spawn(async move { checker.check(&owned_email).await }));

    let outcome = match tokio::time::timeout(timeout, &mut task.0).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            if join_error.is_panic() {
                warn!(id = %registered.id, "checker panicked");
            }
            Err(CheckerError::Aborted)
        }
        Err(_) => Err(CheckerError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    };
    drop(task);

    let elapsed_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(result) => {
            debug!(id = %registered.id, found = result.found, elapsed_ms, "checker finished");
            result
        }
        Err(e) => {
            warn!(id = %registered.id, service = registered.service(), error = %e, elapsed_ms, "checker failed, substituting");
            substitute_failure(registered.service(), &e)
        }
    }
}

/// Negative result standing in for a failed checker
pub fn substitute_failure(service: &str, error: &CheckerError) -> LookupResult {
    let details = if error.is_service_error() {
        format!("{} : {}", SERVICE_ERROR_PREFIX, error)
    } else {
        INCOMPLETE_CHECK_DETAILS.to_string()
    };
    LookupResult::not_found(service).with_details(details)
}

/// Validate the collected list before it replaces the session results
fn assemble(results: Vec<LookupResult>, expected: usize) -> Result<Vec<LookupResult>, OrchestrationError> {
    if results.len() != expected {
        return Err(OrchestrationError::ResultCountMismatch {
            expected,
            actual: results.len(),
        });
    }

    if let Some(position) = results.iter().position(|r| r.service.trim().is_empty()) {
        return Err(OrchestrationError::MissingService { position });
    }

    Ok(results)
}

/// Create the checkers of the configured profile, in execution order
pub fn create_checkers(config: &MailTraceConfig) -> Result<Vec<RegisteredChecker>, CheckerError> {
    let mut checkers = Vec::new();

    match config.profile {
        LookupProfile::Mock => {
            let delay = Duration::from_millis(config.mock_delay_ms);
            for (i, mock) in default_mocks(delay).into_iter().enumerate() {
                let description = format!("Mocked answer for {}", mock.service());
                checkers.push(RegisteredChecker::new(
                    format!("MOCK-{:03}", i + 1),
                    CheckerKind::Mock,
                    description,
                    Arc::new(mock),
                ));
            }
        }
        LookupProfile::Live => {
            let breach = BreachChecker::new(BreachConfig {
                base_url: config.breach_api_url.clone(),
                api_key: config.api_key.clone(),
                user_agent: config.user_agent.clone(),
                timeout_ms: config.timeout_ms,
            })?;
            checkers.push(RegisteredChecker::new(
                "LIVE-001",
                CheckerKind::Breach,
                "Query the Have I Been Pwned breach database",
                Arc::new(breach),
            ));
            checkers.push(RegisteredChecker::new(
                "LIVE-002",
                CheckerKind::Avatar,
                "Derive the Gravatar link from the email hash",
                Arc::new(GravatarChecker::new()),
            ));
        }
        LookupProfile::Redirect => {
            for (i, redirect) in default_redirectors().into_iter().enumerate() {
                let description = format!("Manual search link on {}", redirect.service());
                checkers.push(RegisteredChecker::new(
                    format!("RDR-{:03}", i + 1),
                    CheckerKind::Redirect,
                    description,
                    Arc::new(redirect),
                ));
            }
        }
    }

    Ok(checkers)
}
