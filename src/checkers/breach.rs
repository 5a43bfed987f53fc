//! Breach-database checker (Have I Been Pwned v3).
//!
//! Issues one `GET /breachedaccount/{email}` per lookup:
//! - 404: the address is not in any known breach
//! - 200: JSON array of breaches, the count is the array length
//! - anything else, or a transport failure: [`CheckerError`]
//!
//! The "no breach" answer and a service failure must never look alike to the
//! user, so only the 404 path produces a negative result here.

use super::{Checker, CheckerError};
use crate::validation::normalize_email;
use crate::LookupResult;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BREACH_API_URL: &str = "https://haveibeenpwned.com/api/v3";
const BREACH_SITE_URL: &str = "https://haveibeenpwned.com/";
const API_KEY_HEADER: &str = "hibp-api-key";

pub const NO_BREACH_DETAILS: &str = "Aucune fuite de données connue pour cet email";

/// Settings for the breach checker
#[derive(Debug, Clone)]
pub struct BreachConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// API key sent in the `hibp-api-key` header
    pub api_key: Option<String>,
    pub user_agent: String,
    pub timeout_ms: u64,
}

/// Live breach lookup checker
pub struct BreachChecker {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl BreachChecker {
    /// Build the checker and its HTTP client
    pub fn new(config: BreachConfig) -> Result<Self, CheckerError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| CheckerError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(BreachChecker {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            timeout_ms: config.timeout_ms,
        })
    }

    /// Request URL for `email`, percent-encoded into the path
    pub fn endpoint(&self, email: &str) -> String {
        format!(
            "{}/breachedaccount/{}?truncateResponse=true",
            self.base_url,
            urlencoding::encode(&normalize_email(email))
        )
    }

    /// The client timeout covers the body too, so both stages report it alike
    fn request_error(&self, e: reqwest::Error) -> CheckerError {
        if e.is_timeout() {
            CheckerError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            CheckerError::from(e)
        }
    }

    /// Map an HTTP answer to a lookup result
    pub fn interpret(&self, status: StatusCode, body: &str) -> Result<LookupResult, CheckerError> {
        match status {
            StatusCode::NOT_FOUND => Ok(LookupResult::not_found(self.service())
                .with_url(BREACH_SITE_URL)
                .with_details(NO_BREACH_DETAILS)),
            StatusCode::OK => {
                let breaches: Vec<serde_json::Value> =
                    serde_json::from_str(body).map_err(|e| CheckerError::Decode(e.to_string()))?;
                Ok(LookupResult::found(self.service())
                    .with_url(BREACH_SITE_URL)
                    .with_details(format!(
                        "{} fuite(s) de données trouvée(s)",
                        breaches.len()
                    )))
            }
            other => Err(CheckerError::UnexpectedStatus(other.as_u16())),
        }
    }
}

#[async_trait]
impl Checker for BreachChecker {
    fn service(&self) -> &str {
        "Have I Been Pwned"
    }

    async fn check(&self, email: &str) -> Result<LookupResult, CheckerError> {
        let api_key = self.api_key.as_deref().ok_or(CheckerError::MissingApiKey)?;
        let url = self.endpoint(email);
        debug!(url = %url, "querying breach database");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;
        debug!(status = status.as_u16(), "breach database answered");

        self.interpret(status, &body)
    }
}
