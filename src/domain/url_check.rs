//! URL check domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result text reported when a URL raises no flags.
pub const NO_THREATS: &str = "No threats detected";

/// Vendor counts reported by a remote URL analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VendorStats {
    pub total: u32,
    pub malicious: u32,
    pub suspicious: u32,
    pub undetected: u32,
}

/// Safety verdict for a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlVerdict {
    pub is_safe: bool,
    /// Human-readable reason string.
    pub result: String,
    /// Present only when the verdict came from the remote analysis.
    pub stats: Option<VendorStats>,
}

impl UrlVerdict {
    /// Verdict from a list of heuristic reasons.
    pub fn from_reasons(reasons: &[&str]) -> Self {
        if reasons.is_empty() {
            Self {
                is_safe: true,
                result: NO_THREATS.to_string(),
                stats: None,
            }
        } else {
            Self {
                is_safe: false,
                result: reasons.join(", "),
                stats: None,
            }
        }
    }

    /// Verdict from remote vendor counts.
    pub fn from_stats(stats: VendorStats) -> Self {
        let is_safe = stats.malicious == 0 && stats.suspicious == 0;
        let result = if is_safe {
            NO_THREATS.to_string()
        } else {
            format!(
                "Detected as malicious by {} and suspicious by {} security vendors",
                stats.malicious, stats.suspicious
            )
        };

        Self {
            is_safe,
            result,
            stats: Some(stats),
        }
    }
}

/// A URL check waiting to be stored.
#[derive(Debug, Clone)]
pub struct NewUrlCheck {
    pub url: String,
    pub is_safe: bool,
    pub result: String,
}

impl NewUrlCheck {
    pub fn new(url: impl Into<String>, verdict: &UrlVerdict) -> Self {
        Self {
            url: url.into(),
            is_safe: verdict.is_safe,
            result: verdict.result.clone(),
        }
    }
}

/// A stored URL check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlCheck {
    pub id: i64,
    pub url: String,
    pub is_safe: bool,
    pub result: String,
    pub checked_at: DateTime<Utc>,
}
