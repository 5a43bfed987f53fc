//! Test doubles for running lookups without real services.
//!
//! - `checkers`: scripted checkers with call recording, panics and delays
//! - `http`: a one-shot local HTTP server answering with a canned response

pub mod http;

pub use checkers::*;
pub use http::*;
