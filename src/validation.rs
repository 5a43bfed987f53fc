//! Email input validation.
//!
//! Only the basic shape `localpart@domain.tld` is checked: a single `@`,
//! at least one `.` after it, and no whitespace. The raw input is never
//! rewritten here; checkers normalize on their own with [`normalize_email`].

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape pattern is valid"));

/// Reasons an email is rejected before any checker runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Nothing was entered
    #[error("Veuillez entrer une adresse email")]
    EmptyInput,
    /// Input does not look like `localpart@domain.tld`
    #[error("Adresse email invalide : {input}")]
    InvalidFormat { input: String },
}

/// Validate the shape of a raw email input.
pub fn validate_email(input: &str) -> Result<(), ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    if !EMAIL_SHAPE.is_match(input) {
        return Err(ValidationError::InvalidFormat {
            input: input.to_string(),
        });
    }

    Ok(())
}

/// Trimmed, lowercased form of an email used for hashing and URL building.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
