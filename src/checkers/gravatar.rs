//! Avatar-by-hash checker.
//!
//! Gravatar addresses avatars by a SHA-256 digest of the trimmed, lowercased
//! email. The link is built without any request, so a positive answer only
//! means a profile is probable, never confirmed.

use super::{Checker, CheckerError};
use crate::validation::normalize_email;
use crate::LookupResult;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

const GRAVATAR_AVATAR_BASE: &str = "https://gravatar.com/avatar";

pub const UNVERIFIED_LINK_DETAILS: &str =
    "Lien non vérifié : l'avatar n'existe que si un compte Gravatar est associé à cet email";

/// Deterministic Gravatar link checker
#[derive(Debug, Clone, Default)]
pub struct GravatarChecker;

impl GravatarChecker {
    pub fn new() -> Self {
        GravatarChecker
    }

    /// Hex SHA-256 digest of the normalized email
    pub fn email_hash(email: &str) -> String {
        let digest = Sha256::digest(normalize_email(email).as_bytes());
        hex::encode(digest)
    }

    /// Avatar URL for `email`; `d=404` makes a missing avatar a hard 404
    pub fn avatar_url(email: &str) -> String {
        format!("{}/{}?d=404", GRAVATAR_AVATAR_BASE, Self::email_hash(email))
    }
}

#[async_trait]
impl Checker for GravatarChecker {
    fn service(&self) -> &str {
        "Gravatar"
    }

    async fn check(&self, email: &str) -> Result<LookupResult, CheckerError> {
        Ok(LookupResult::found(self.service())
            .with_url(Self::avatar_url(email))
            .with_details(UNVERIFIED_LINK_DETAILS))
    }
}
