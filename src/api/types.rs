//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PhoneCheck, PhoneDetails, PhoneVerdict, UrlCheck, UrlVerdict, VendorStats};

// ==================== URL Checks ====================

/// Request to check a URL.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckUrlRequest {
    /// The URL to check. Must be an http(s) URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// Verdict for a URL plus the recent URL history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckUrlResponse {
    pub url: String,
    pub is_safe: bool,
    pub result: String,
    /// Vendor counts, present when the verdict came from VirusTotal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<VendorStats>,
    pub history: Vec<UrlCheck>,
}

impl CheckUrlResponse {
    pub fn new(url: String, verdict: UrlVerdict, history: Vec<UrlCheck>) -> Self {
        Self {
            url,
            is_safe: verdict.is_safe,
            result: verdict.result,
            stats: verdict.stats,
            history,
        }
    }
}

// ==================== Phone Checks ====================

/// Request to check a phone number.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckPhoneRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Verdict for a phone number plus the recent phone history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckPhoneResponse {
    /// Normalized `+<digits>` form.
    pub phone_number: String,
    pub country: String,
    pub carrier: String,
    pub line_type: String,
    /// Risk score in 0..=100.
    pub risk_score: u8,
    pub details: PhoneDetails,
    pub is_safe: bool,
    pub history: Vec<PhoneCheck>,
}

impl CheckPhoneResponse {
    pub fn new(verdict: PhoneVerdict, history: Vec<PhoneCheck>) -> Self {
        Self {
            is_safe: verdict.is_safe(),
            phone_number: verdict.phone_number,
            country: verdict.country,
            carrier: verdict.carrier,
            line_type: verdict.line_type,
            risk_score: verdict.risk_score,
            details: verdict.details,
            history,
        }
    }
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
    /// "virustotal" or "heuristic".
    pub url_reputation: String,
    /// "abstractapi" or "heuristic".
    pub phone_validation: String,
    /// Current timestamp.
    pub timestamp: String,
}
