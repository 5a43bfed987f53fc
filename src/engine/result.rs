//! Lookup report and summary statistics.

use crate::{LookupProfile, LookupResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub found: u32,
    pub not_found: u32,
    pub total: u32,
}

/// Completed lookup, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub email: String,
    pub profile: LookupProfile,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<LookupResult>,
    pub total_duration_ms: u64,
}

impl LookupReport {
    /// Create a report stamped with the current time
    pub fn new(email: String, profile: LookupProfile, results: Vec<LookupResult>, total_duration_ms: u64) -> Self {
        LookupReport {
            email,
            profile,
            timestamp: Utc::now(),
            results,
            total_duration_ms,
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();

        for result in &self.results {
            summary.total += 1;
            if result.found {
                summary.found += 1;
            } else {
                summary.not_found += 1;
            }
        }

        summary
    }

    /// Results with a positive match
    pub fn found(&self) -> Vec<&LookupResult> {
        self.results.iter().filter(|r| r.found).collect()
    }
}
