//! Orchestrator integration tests.
//!
//! Tests for validation gating, sequential execution, per-checker failure
//! isolation, session transitions and result replacement.

use crate::mocks::{CallLog, RecordingObserver, Script, ScriptedChecker};
use mailtrace::checkers::CheckerError;
use mailtrace::engine::orchestrator::{
    LookupOrchestrator, OrchestratorConfig, INCOMPLETE_CHECK_DETAILS, SERVICE_ERROR_PREFIX,
};
use mailtrace::engine::session::SessionError;
use mailtrace::{OrchestrationError, ValidationError};
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn orchestrator() -> LookupOrchestrator {
    LookupOrchestrator::new(OrchestratorConfig::default())
}

fn services(results: &[mailtrace::LookupResult]) -> Vec<&str> {
    results.iter().map(|r| r.service.as_str()).collect()
}

#[tokio::test]
async fn test_valid_email_runs_every_checker_in_order() {
    let mut orch = orchestrator();
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-001"));
    orch.register_checker(ScriptedChecker::new("LinkedIn", Script::NotFound).register("T-002"));
    orch.register_checker(ScriptedChecker::new("Twitter", Script::Found).register("T-003"));

    let snapshot = orch.submit("user@example.com").await;

    assert_eq!(services(&snapshot.results), vec!["GitHub", "LinkedIn", "Twitter"]);
    assert!(snapshot.error.is_none());
    assert!(!snapshot.is_searching);
    assert_eq!(snapshot.email, "user@example.com");
}

#[tokio::test]
async fn test_invalid_email_invokes_no_checker_and_keeps_results() {
    let mut orch = orchestrator();
    let checker = ScriptedChecker::new("GitHub", Script::Found);
    let calls = checker.calls();
    orch.register_checker(checker.register("T-001"));

    let first = orch.submit("user@example.com").await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    for input in ["abc", "a@b", "a b@c.com"] {
        let snapshot = orch.submit(input).await;
        assert_eq!(snapshot.results, first.results, "results changed for {:?}", input);
        assert!(matches!(
            snapshot.error,
            Some(SessionError::Validation(ValidationError::InvalidFormat { .. }))
        ));
        assert!(snapshot.error_message().is_some_and(|m| !m.is_empty()));
        assert_eq!(snapshot.email, input);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_email_sets_prompt_message() {
    let mut orch = orchestrator();
    let checker = ScriptedChecker::new("GitHub", Script::Found);
    let calls = checker.calls();
    orch.register_checker(checker.register("T-001"));

    let snapshot = orch.submit("").await;

    assert_eq!(
        snapshot.error_message().as_deref(),
        Some("Veuillez entrer une adresse email")
    );
    assert!(snapshot.results.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failing_checker_is_substituted_and_others_unaffected() {
    let mut orch = orchestrator();
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-001"));
    orch.register_checker(
        ScriptedChecker::new("Breaches", Script::Fail(CheckerError::Transport("connection refused".to_string())))
            .register("T-002"),
    );
    orch.register_checker(ScriptedChecker::new("Twitter", Script::Found).register("T-003"));

    let snapshot = orch.submit("user@example.com").await;

    assert!(snapshot.error.is_none());
    assert_eq!(services(&snapshot.results), vec!["GitHub", "Breaches", "Twitter"]);

    let failed = &snapshot.results[1];
    assert!(!failed.found);
    assert!(failed.url.is_none());
    assert!(failed.details.as_deref().unwrap().starts_with(SERVICE_ERROR_PREFIX));

    assert!(snapshot.results[0].found);
    assert!(snapshot.results[2].found);
}

#[tokio::test]
async fn test_panicking_checker_is_isolated() {
    let mut orch = orchestrator();
    orch.register_checker(ScriptedChecker::new("Broken", Script::Panic).register("T-001"));
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-002"));

    let snapshot = orch.submit("user@example.com").await;

    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.results.len(), 2);
    assert!(!snapshot.results[0].found);
    assert_eq!(snapshot.results[0].service, "Broken");
    assert_eq!(snapshot.results[0].details.as_deref(), Some(INCOMPLETE_CHECK_DETAILS));
    assert!(snapshot.results[1].found);
}

#[tokio::test(start_paused = true)]
async fn test_slow_checker_times_out_and_sequence_continues() {
    let mut orch = LookupOrchestrator::new(OrchestratorConfig { timeout_ms: 1000 });
    orch.register_checker(
        ScriptedChecker::new("Slow", Script::Found)
            .with_delay(Duration::from_secs(60))
            .register("T-001"),
    );
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-002"));

    let snapshot = orch.submit("user@example.com").await;

    assert!(!snapshot.results[0].found);
    assert_eq!(
        snapshot.results[0].details.as_deref(),
        Some("Erreur du service : pas de réponse après 1000 ms")
    );
    assert!(snapshot.results[1].found);
}

#[tokio::test(start_paused = true)]
async fn test_checkers_never_overlap() {
    let log = CallLog::new();
    let mut orch = orchestrator();
    orch.register_checker(
        ScriptedChecker::new("A", Script::Found)
            .with_delay(Duration::from_millis(300))
            .with_log(log.clone())
            .register("T-001"),
    );
    orch.register_checker(
        ScriptedChecker::new("B", Script::NotFound)
            .with_delay(Duration::from_millis(10))
            .with_log(log.clone())
            .register("T-002"),
    );
    orch.register_checker(
        ScriptedChecker::new("C", Script::Found)
            .with_delay(Duration::from_millis(100))
            .with_log(log.clone())
            .register("T-003"),
    );

    orch.submit("user@example.com").await;

    assert_eq!(
        log.events(),
        vec!["start A", "end A", "start B", "end B", "start C", "end C"]
    );
}

#[tokio::test]
async fn test_searching_flag_brackets_the_search() {
    let observer = RecordingObserver::new();
    let mut orch = orchestrator();
    orch.add_observer(observer.clone());
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-001"));
    orch.register_checker(ScriptedChecker::new("LinkedIn", Script::NotFound).register("T-002"));

    assert!(orch.snapshot().can_submit());
    orch.submit("user@example.com").await;

    let snapshots = observer.snapshots();
    assert_eq!(snapshots.len(), 2);

    assert!(snapshots[0].is_searching);
    assert!(!snapshots[0].can_submit());
    assert!(snapshots[0].results.is_empty());
    assert!(snapshots[0].error.is_none());

    assert!(!snapshots[1].is_searching);
    assert!(snapshots[1].can_submit());
    assert_eq!(snapshots[1].results.len(), 2);

    assert!(!orch.snapshot().is_searching);
}

#[tokio::test]
async fn test_rejected_input_never_enters_searching() {
    let observer = RecordingObserver::new();
    let mut orch = orchestrator();
    orch.add_observer(observer.clone());
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-001"));

    orch.submit("abc").await;

    let snapshots = observer.snapshots();
    assert_eq!(snapshots.len(), 1);
    assert!(!snapshots[0].is_searching);
    assert!(snapshots[0].error.is_some());
}

#[tokio::test]
async fn test_assembly_failure_sets_generic_error() {
    let mut orch = orchestrator();
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-001"));
    orch.register_checker(ScriptedChecker::new("Nameless", Script::Nameless).register("T-002"));

    let snapshot = orch.submit("user@example.com").await;

    assert!(!snapshot.is_searching);
    assert!(snapshot.results.is_empty());
    assert_eq!(
        snapshot.error,
        Some(SessionError::Orchestration(OrchestrationError::MissingService { position: 1 }))
    );
    assert_eq!(
        snapshot.error_message().as_deref(),
        Some("Une erreur est survenue pendant la recherche")
    );
}

#[tokio::test]
async fn test_new_search_clears_previous_error() {
    let mut orch = orchestrator();
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-001"));

    assert!(orch.submit("a@b").await.error.is_some());
    let snapshot = orch.submit("user@example.com").await;
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.results.len(), 1);
}

#[tokio::test]
async fn test_results_replaced_wholesale() {
    let mut orch = orchestrator();
    orch.register_checker(ScriptedChecker::new("GitHub", Script::Found).register("T-001"));
    orch.register_checker(ScriptedChecker::new("LinkedIn", Script::NotFound).register("T-002"));

    let first = orch.submit("first@example.com").await;
    let second = orch.submit("second@example.com").await;

    assert_eq!(second.results.len(), 2);
    assert_eq!(first.results[0].details.as_deref(), Some("call 1"));
    assert_eq!(second.results[0].details.as_deref(), Some("call 2"));
    assert!(second.results[0].url.as_deref().unwrap().ends_with("second@example.com"));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_submit_returns_session_to_idle_and_stops_checker() {
    let log = CallLog::new();
    let mut orch = orchestrator();
    orch.register_checker(
        ScriptedChecker::new("Slow", Script::Found)
            .with_delay(Duration::from_secs(5))
            .with_log(log.clone())
            .register("T-001"),
    );

    let outcome = tokio::time::timeout(Duration::from_millis(100), orch.submit("user@example.com")).await;
    assert!(outcome.is_err());

    let snapshot = orch.snapshot();
    assert!(!snapshot.is_searching);
    assert!(snapshot.can_submit());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(log.events(), vec!["start Slow"]);
}

#[tokio::test]
async fn test_no_checkers_yields_empty_results() {
    let mut orch = orchestrator();
    let snapshot = orch.submit("user@example.com").await;
    assert!(snapshot.results.is_empty());
    assert!(snapshot.error.is_none());
}
