//! Phone check domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Score at or above which a number is considered unsafe.
pub const UNSAFE_RISK_THRESHOLD: u8 = 50;

/// Structured details attached to a phone verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneDetails {
    pub valid: bool,
    /// Display form of the number.
    pub formatted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub spam_reports: u32,
}

/// Safety verdict for a single phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneVerdict {
    /// Normalized `+<digits>` form.
    pub phone_number: String,
    pub country: String,
    pub carrier: String,
    pub line_type: String,
    pub risk_score: u8,
    pub details: PhoneDetails,
}

impl PhoneVerdict {
    pub fn is_safe(&self) -> bool {
        self.risk_score < UNSAFE_RISK_THRESHOLD
    }
}

/// A phone check waiting to be stored.
#[derive(Debug, Clone)]
pub struct NewPhoneCheck {
    pub phone_number: String,
    pub is_safe: bool,
    pub country: Option<String>,
    pub carrier: Option<String>,
    pub line_type: Option<String>,
    pub risk_score: Option<u8>,
    pub details: Option<PhoneDetails>,
}

impl From<&PhoneVerdict> for NewPhoneCheck {
    fn from(verdict: &PhoneVerdict) -> Self {
        Self {
            phone_number: verdict.phone_number.clone(),
            is_safe: verdict.is_safe(),
            country: Some(verdict.country.clone()),
            carrier: Some(verdict.carrier.clone()),
            line_type: Some(verdict.line_type.clone()),
            risk_score: Some(verdict.risk_score),
            details: Some(verdict.details.clone()),
        }
    }
}

/// A stored phone check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneCheck {
    pub id: i64,
    pub phone_number: String,
    pub is_safe: bool,
    pub country: Option<String>,
    pub carrier: Option<String>,
    pub line_type: Option<String>,
    pub risk_score: Option<u8>,
    pub details: Option<PhoneDetails>,
    pub checked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(risk_score: u8) -> PhoneVerdict {
        PhoneVerdict {
            phone_number: "+14155551234".to_string(),
            country: "United States".to_string(),
            carrier: "Verizon".to_string(),
            line_type: "Mobile".to_string(),
            risk_score,
            details: PhoneDetails {
                valid: true,
                formatted: "+1 (415) 555-1234".to_string(),
                location: None,
                spam_reports: 0,
            },
        }
    }

    #[test]
    fn test_safety_threshold() {
        assert!(verdict(49).is_safe());
        assert!(!verdict(50).is_safe());
        assert!(!verdict(100).is_safe());
    }

    #[test]
    fn test_new_check_copies_verdict() {
        let check = NewPhoneCheck::from(&verdict(20));
        assert!(check.is_safe);
        assert_eq!(check.risk_score, Some(20));
        assert_eq!(check.country.as_deref(), Some("United States"));
    }

    #[test]
    fn test_details_serialize_spam_reports() {
        let json = serde_json::to_value(verdict(0).details).unwrap();
        assert_eq!(json["spamReports"], 0);
        assert!(json.get("location").is_none());
    }
}
