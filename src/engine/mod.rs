//! Lookup engine module.
//!
//! Provides the orchestrator, the session state it owns, and the report
//! built from a completed search.

pub mod orchestrator;
pub mod result;
pub mod session;
