//! Verdict engine for Cyberfort Core.
//!
//! This module contains the check pipeline:
//! - URL Scanner: format validation and regex red flags
//! - Phone Heuristics: normalization and offline risk estimate
//! - VirusTotal / AbstractAPI: remote reputation clients
//! - Verdict Engine: prefers the remote answer, falls back to heuristics

mod abstractapi;
mod phone_heuristics;
mod url_scanner;
mod verdict;
mod virustotal;

pub use abstractapi::*;
pub use phone_heuristics::*;
pub use url_scanner::*;
pub use verdict::*;
pub use virustotal::*;
