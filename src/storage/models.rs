//! Database models for Cyberfort Core.
//!
//! These are the row types returned by SQLx queries.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{PhoneCheck, UrlCheck};
use crate::error::CheckError;

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CheckError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CheckError::Internal(format!("bad timestamp '{}': {}", value, e)))
}

/// Database row for url_checks table.
#[derive(Debug, Clone, FromRow)]
pub struct UrlCheckRow {
    pub id: i64,
    pub url: String,
    pub is_safe: bool,
    pub result: String,
    pub checked_at: String,
}

impl TryFrom<UrlCheckRow> for UrlCheck {
    type Error = CheckError;

    fn try_from(row: UrlCheckRow) -> Result<Self, Self::Error> {
        Ok(UrlCheck {
            id: row.id,
            url: row.url,
            is_safe: row.is_safe,
            result: row.result,
            checked_at: parse_timestamp(&row.checked_at)?,
        })
    }
}

/// Database row for phone_checks table.
#[derive(Debug, Clone, FromRow)]
pub struct PhoneCheckRow {
    pub id: i64,
    pub phone_number: String,
    pub is_safe: bool,
    pub country: Option<String>,
    pub carrier: Option<String>,
    pub line_type: Option<String>,
    pub risk_score: Option<i64>,
    pub details: Option<String>,
    pub checked_at: String,
}

impl TryFrom<PhoneCheckRow> for PhoneCheck {
    type Error = CheckError;

    fn try_from(row: PhoneCheckRow) -> Result<Self, Self::Error> {
        Ok(PhoneCheck {
            id: row.id,
            phone_number: row.phone_number,
            is_safe: row.is_safe,
            country: row.country,
            carrier: row.carrier,
            line_type: row.line_type,
            risk_score: row
                .risk_score
                .map(|score| {
                    u8::try_from(score).map_err(|_| {
                        CheckError::Internal(format!("risk score {} out of range", score))
                    })
                })
                .transpose()?,
            details: row
                .details
                .map(|d| serde_json::from_str(&d))
                .transpose()?,
            checked_at: parse_timestamp(&row.checked_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone_row() -> PhoneCheckRow {
        PhoneCheckRow {
            id: 3,
            phone_number: "+14155551234".to_string(),
            is_safe: true,
            country: Some("United States".to_string()),
            carrier: None,
            line_type: None,
            risk_score: Some(20),
            details: Some(r#"{"valid":true,"formatted":"+1 (415) 555-1234","spamReports":0}"#.to_string()),
            checked_at: "2026-10-18T09:30:00.125Z".to_string(),
        }
    }

    #[test]
    fn test_phone_row_conversion() {
        let check = PhoneCheck::try_from(phone_row()).unwrap();
        assert_eq!(check.risk_score, Some(20));
        assert_eq!(check.details.unwrap().formatted, "+1 (415) 555-1234");
        assert_eq!(check.checked_at.timestamp_subsec_millis(), 125);
    }

    #[test]
    fn test_out_of_range_risk_score_is_rejected() {
        let row = PhoneCheckRow {
            risk_score: Some(300),
            ..phone_row()
        };
        assert!(matches!(
            PhoneCheck::try_from(row),
            Err(CheckError::Internal(_))
        ));
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let row = UrlCheckRow {
            id: 1,
            url: "https://example.com".to_string(),
            is_safe: true,
            result: "No threats detected".to_string(),
            checked_at: "yesterday".to_string(),
        };
        assert!(UrlCheck::try_from(row).is_err());
    }
}
