//! Mocked checkers.
//!
//! Stand-ins that answer with a fixed record after a simulated delay. They
//! exercise the whole workflow without touching the network.

use super::{Checker, CheckerError};
use crate::LookupResult;
use async_trait::async_trait;
use std::time::Duration;

/// Built-in mocked answers, in registration order: (service, found, url)
pub const DEFAULT_MOCKS: &[(&str, bool, Option<&str>)] = &[
    ("GitHub", true, Some("https://github.com")),
    ("Twitter", true, Some("https://twitter.com")),
    ("LinkedIn", false, None),
    ("Facebook", true, Some("https://facebook.com")),
];

/// Checker with a canned answer
#[derive(Debug, Clone)]
pub struct MockChecker {
    service: String,
    found: bool,
    url: Option<String>,
    delay: Duration,
}

impl MockChecker {
    pub fn new(service: impl Into<String>, found: bool, url: Option<String>, delay: Duration) -> Self {
        MockChecker {
            service: service.into(),
            found,
            url,
            delay,
        }
    }
}

/// All built-in mocked checkers, each waiting `delay` before answering
pub fn default_mocks(delay: Duration) -> Vec<MockChecker> {
    DEFAULT_MOCKS
        .iter()
        .map(|(service, found, url)| MockChecker::new(*service, *found, url.map(String::from), delay))
        .collect()
}

#[async_trait]
impl Checker for MockChecker {
    fn service(&self) -> &str {
        &self.service
    }

    async fn check(&self, _email: &str) -> Result<LookupResult, CheckerError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(LookupResult {
            service: self.service.clone(),
            found: self.found,
            url: self.url.clone(),
            details: None,
        })
    }
}
