//! Static redirector checkers.
//!
//! No verification happens here. Each redirector builds a search URL with the
//! percent-encoded email in its query string and always reports
//! `found = false`, meaning "manual check required".

use super::{Checker, CheckerError};
use crate::validation::normalize_email;
use crate::LookupResult;
use async_trait::async_trait;

/// Placeholder replaced by the encoded email in URL templates
pub const EMAIL_PLACEHOLDER: &str = "{email}";

pub const MANUAL_CHECK_DETAILS: &str =
    "Vérification manuelle requise : ouvrez le lien pour rechercher cet email";

/// Built-in redirectors, in registration order: (service, URL template)
pub const DEFAULT_REDIRECTS: &[(&str, &str)] = &[
    ("Google", "https://www.google.com/search?q=%22{email}%22"),
    ("GitHub", "https://github.com/search?q={email}&type=users"),
    ("LinkedIn", "https://www.linkedin.com/search/results/all/?keywords={email}"),
    ("Twitter", "https://twitter.com/search?q={email}&f=user"),
    ("Facebook", "https://www.facebook.com/search/top/?q={email}"),
];

/// Manual-search link for one service
#[derive(Debug, Clone)]
pub struct RedirectChecker {
    service: String,
    url_template: String,
}

impl RedirectChecker {
    pub fn new(service: impl Into<String>, url_template: impl Into<String>) -> Self {
        RedirectChecker {
            service: service.into(),
            url_template: url_template.into(),
        }
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Search URL for `email`
    pub fn search_url(&self, email: &str) -> String {
        let encoded = urlencoding::encode(&normalize_email(email)).into_owned();
        self.url_template.replace(EMAIL_PLACEHOLDER, &encoded)
    }
}

/// All built-in redirectors
pub fn default_redirectors() -> Vec<RedirectChecker> {
    DEFAULT_REDIRECTS
        .iter()
        .map(|(service, template)| RedirectChecker::new(*service, *template))
        .collect()
}

#[async_trait]
impl Checker for RedirectChecker {
    fn service(&self) -> &str {
        &self.service
    }

    async fn check(&self, email: &str) -> Result<LookupResult, CheckerError> {
        Ok(LookupResult::not_found(self.service.as_str())
            .with_url(self.search_url(email))
            .with_details(MANUAL_CHECK_DETAILS))
    }
}
