//! mailtrace library
//!
//! Finds third-party services where an email address may have a public
//! profile or a data-breach record.
//!
//! This library provides:
//! - Email shape validation
//! - A uniform async checker capability with mock, live and redirect checkers
//! - A sequential lookup orchestrator with per-checker failure isolation
//! - Session state snapshots published to observers
//! - Terminal and JSON report formatting
//!
//! # Example
//!
//! ```no_run
//! use mailtrace::{run_lookup, MailTraceConfig};
//!
//! # async fn demo() -> Result<(), mailtrace::MailTraceError> {
//! let config = MailTraceConfig::default();
//! let report = run_lookup(&config, "user@example.com").await?;
//! println!("Services checked: {}", report.summary().total);
//! # Ok(())
//! # }
//! ```

pub mod checkers;
pub mod cli;
pub mod config;
pub mod engine;
pub mod validation;
pub mod version;

use engine::orchestrator::{create_checkers, LookupOrchestrator, OrchestratorConfig};
use engine::result::LookupReport;
use engine::session::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

// Re-exports for public API
pub use checkers::{Checker, CheckerError};
pub use config::{ConfigError, MailTraceConfig};
pub use engine::orchestrator::{LookupOrchestrator as Orchestrator, OrchestrationError};
pub use engine::result::{LookupReport as Report, ResultSummary};
pub use engine::session::{SessionObserver, SessionSnapshot};
pub use validation::{validate_email, ValidationError};

/// Outcome of one checker invocation for one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Display name of the checked source
    pub service: String,
    /// Positive match; `false` also covers "manual check required"
    pub found: bool,
    /// Deep link to the source (profile URL or search query)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Human-readable annotation of what `found`/`url` mean here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LookupResult {
    /// A positive match for `service`
    pub fn found(service: impl Into<String>) -> Self {
        LookupResult {
            service: service.into(),
            found: true,
            url: None,
            details: None,
        }
    }

    /// A negative (or unverified) result for `service`
    pub fn not_found(service: impl Into<String>) -> Self {
        LookupResult {
            service: service.into(),
            found: false,
            url: None,
            details: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for LookupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.found { "FOUND" } else { "NOT FOUND" };
        write!(f, "{}: {}", status, self.service)?;
        if let Some(ref url) = self.url {
            write!(f, " <{}>", url)?;
        }
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Registered checker set. Each profile corresponds to one generation of
/// the lookup workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LookupProfile {
    /// Fixed mocked results after a simulated delay
    Mock,
    /// Breach-database query plus avatar-by-hash link
    Live,
    /// Static search links for manual follow-up
    #[default]
    Redirect,
}

impl fmt::Display for LookupProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupProfile::Mock => write!(f, "mock"),
            LookupProfile::Live => write!(f, "live"),
            LookupProfile::Redirect => write!(f, "redirect"),
        }
    }
}

impl FromStr for LookupProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(LookupProfile::Mock),
            "live" => Ok(LookupProfile::Live),
            "redirect" => Ok(LookupProfile::Redirect),
            _ => Err(format!(
                "Unknown profile: '{}'. Valid profiles: mock, live, redirect",
                s
            )),
        }
    }
}

/// Error types for mailtrace operations.
#[derive(Debug, thiserror::Error)]
pub enum MailTraceError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The submitted email was rejected before any lookup ran
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The search failed outside any single checker
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
    /// A checker could not be constructed
    #[error("checker setup failed: {0}")]
    CheckerSetup(#[from] CheckerError),
}

/// Run one lookup for `email` with the checkers of `config.profile`.
///
/// Validation and orchestration failures of the session are returned as
/// errors; individual checker failures are already substituted inside the
/// report's results.
///
/// # Example
///
/// ```no_run
/// use mailtrace::{run_lookup, LookupProfile, MailTraceConfig};
///
/// # async fn demo() {
/// let config = MailTraceConfig {
///     profile: LookupProfile::Redirect,
///     ..Default::default()
/// };
///
/// match run_lookup(&config, "user@example.com").await {
///     Ok(report) => {
///         for result in &report.results {
///             println!("{}", result);
///         }
///     }
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// # }
/// ```
pub async fn run_lookup(config: &MailTraceConfig, email: &str) -> Result<LookupReport, MailTraceError> {
    let mut orchestrator = LookupOrchestrator::new(OrchestratorConfig::from(config));
    orchestrator.register_checkers(create_checkers(config)?);

    let start = Instant::now();
    let snapshot = orchestrator.submit(email).await;
    let total_duration_ms = start.elapsed().as_millis() as u64;

    match snapshot.error {
        Some(SessionError::Validation(e)) => Err(e.into()),
        Some(SessionError::Orchestration(e)) => Err(e.into()),
        None => Ok(LookupReport::new(
            snapshot.email,
            config.profile,
            snapshot.results,
            total_duration_ms,
        )),
    }
}
