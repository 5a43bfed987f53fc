//! Version and build information.
//!
//! Reports the build metadata embedded by `build.rs` together with what a
//! lookup does out of the box: the default profile, the profiles compiled
//! in and the breach API it talks to.

use crate::checkers::breach::DEFAULT_BREACH_API_URL;
use crate::LookupProfile;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// Build information
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_date: Option<&'static str>,
    pub target: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rustc_version: Option<&'static str>,
    pub default_profile: LookupProfile,
    pub profiles: &'static [LookupProfile],
    pub breach_api: &'static str,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mailtrace {}", self.version)?;

        if let Some(commit) = self.commit {
            writeln!(f, "Commit: {}", commit)?;
        }
        if let Some(date) = self.build_date {
            writeln!(f, "Built: {}", date)?;
        }
        if let Some(rustc) = self.rustc_version {
            writeln!(f, "Rustc: {}", rustc)?;
        }
        writeln!(f, "Target: {}", self.target)?;

        let profiles: Vec<String> = self.profiles.iter().map(|p| p.to_string()).collect();
        writeln!(
            f,
            "Profile: {} (available: {})",
            self.default_profile,
            profiles.join(", ")
        )?;
        write!(f, "Breach API: {}", self.breach_api)
    }
}

/// Get build information
pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("MAILTRACE_GIT_HASH"),
        build_date: option_env!("MAILTRACE_BUILD_DATE"),
        target: std::env::consts::ARCH,
        rustc_version: option_env!("MAILTRACE_RUSTC_VERSION"),
        default_profile: LookupProfile::default(),
        profiles: LookupProfile::value_variants(),
        breach_api: DEFAULT_BREACH_API_URL,
    }
}
