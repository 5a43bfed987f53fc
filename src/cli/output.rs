//! Output formatting for mailtrace.
//!
//! Provides terminal and JSON output formatters, plus a progress observer
//! that reports session transitions while a search runs.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: Color disabled via NO_COLOR or --no-color
//! - Empty reports: Produce valid output with zero results
//! - Missing url/details: Omitted from the line, never printed empty
//!
//! All formatters produce valid output for any LookupReport input.

use crate::cli::args::OutputFormat;
use crate::engine::orchestrator::RegisteredChecker;
use crate::engine::result::LookupReport;
use crate::engine::session::{SessionObserver, SessionSnapshot};
use serde_json::json;
use std::io::Write;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a completed lookup
    fn format(&self, report: &LookupReport) -> String;

    /// Format a session error for `email`
    fn format_error(&self, email: &str, message: &str) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.colorize(text, "32")
    }

    fn red(&self, text: &str) -> String {
        self.colorize(text, "31")
    }

    fn gray(&self, text: &str) -> String {
        self.colorize(text, "90")
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &LookupReport) -> String {
        let mut output = String::new();

        output.push_str(RULE);
        output.push('\n');
        output.push_str("mailtrace lookup report\n");
        output.push_str(&format!("Email: {}\n", report.email));
        output.push_str(&format!("Profile: {}\n", report.profile));
        output.push_str(&format!("Timestamp: {}\n", report.timestamp.to_rfc3339()));
        output.push_str(RULE);
        output.push_str("\n\n");

        for (i, result) in report.results.iter().enumerate() {
            if self.quiet && !result.found {
                continue;
            }

            let status = if result.found {
                self.green("[FOUND]")
            } else {
                self.red("[-----]")
            };
            output.push_str(&format!("  {:>2}. {} {}", i + 1, status, result.service));

            if let Some(ref url) = result.url {
                output.push_str(&format!("  {}", url));
            }
            output.push('\n');

            if self.verbose {
                if let Some(ref details) = result.details {
                    output.push_str(&format!("        {}\n", self.gray(details)));
                }
            }
        }

        let summary = report.summary();
        output.push('\n');
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} found, {} not found, {} checked\n",
            summary.found, summary.not_found, summary.total
        ));
        output.push_str(&format!(
            "Total time: {:.1}s\n",
            report.total_duration_ms as f64 / 1000.0
        ));
        output.push_str(RULE);

        output
    }

    fn format_error(&self, email: &str, message: &str) -> String {
        if email.is_empty() {
            format!("{} {}", self.red("Error:"), message)
        } else {
            format!("{} {} ({})", self.red("Error:"), message, email)
        }
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        // Serializing a Value cannot fail
        rendered.unwrap_or_default()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &LookupReport) -> String {
        let value = json!({
            "email": report.email,
            "profile": report.profile,
            "timestamp": report.timestamp,
            "total_duration_ms": report.total_duration_ms,
            "summary": report.summary(),
            "results": report.results,
        });
        self.render(&value)
    }

    fn format_error(&self, email: &str, message: &str) -> String {
        self.render(&json!({ "email": email, "error": message }))
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(format: &OutputFormat, no_color: bool, verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(!no_color, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

/// Text listing of registered checkers
pub fn format_checker_list(checkers: &[RegisteredChecker]) -> String {
    let mut output = String::from("Available checkers:\n\n");
    for checker in checkers {
        output.push_str(&format!(
            "  {:<9}{:<20}{:<10}{}\n",
            checker.id,
            checker.service(),
            checker.kind.to_string(),
            checker.description
        ));
    }
    output
}

/// Reports search progress on stderr
pub struct ProgressObserver;

impl SessionObserver for ProgressObserver {
    fn on_state_change(&self, snapshot: &SessionSnapshot) {
        if snapshot.is_searching {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "Recherche en cours pour {}...", snapshot.email);
        }
    }
}
