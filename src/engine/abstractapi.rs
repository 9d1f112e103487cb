//! Phone validation lookups against AbstractAPI.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{PhoneDetails, PhoneVerdict};
use crate::engine::phone_heuristics::NormalizedPhone;
use crate::engine::virustotal::ensure_success;
use crate::error::{CheckError, CheckResult};

/// Public API endpoint.
pub const ABSTRACTAPI_BASE_URL: &str = "https://phonevalidation.abstractapi.com/v1";

const INVALID_NUMBER_RISK: u32 = 70;
const VOIP_RISK: u32 = 30;

/// AbstractAPI client configuration.
#[derive(Debug, Clone)]
pub struct AbstractApiConfig {
    pub api_key: String,
    /// API root without trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Validation response body. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhoneLookup {
    pub valid: bool,
    #[serde(rename = "type")]
    pub line_type: Option<String>,
    pub carrier: Option<String>,
    pub country: Option<LookupCountry>,
    pub location: Option<String>,
    pub format: Option<LookupFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LookupCountry {
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LookupFormat {
    pub international: Option<String>,
}

/// Absent and empty strings both read as "Unknown".
fn or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "Unknown".to_string(),
    }
}

impl PhoneLookup {
    /// Risk from validity and line type, capped at 100.
    pub fn risk_score(&self) -> u8 {
        let mut risk = 0;
        if !self.valid {
            risk += INVALID_NUMBER_RISK;
        }
        if self
            .line_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("voip"))
        {
            risk += VOIP_RISK;
        }
        risk.min(100) as u8
    }

    /// Build a verdict for the number that was looked up.
    pub fn into_verdict(self, phone: &NormalizedPhone) -> PhoneVerdict {
        let risk_score = self.risk_score();
        let formatted = self
            .format
            .as_ref()
            .and_then(|f| f.international.clone())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| phone.number.clone());

        PhoneVerdict {
            phone_number: phone.number.clone(),
            country: or_unknown(self.country.as_ref().and_then(|c| c.name.as_deref())),
            carrier: or_unknown(self.carrier.as_deref()),
            line_type: or_unknown(self.line_type.as_deref()),
            risk_score,
            details: PhoneDetails {
                valid: self.valid,
                formatted,
                location: self.location.filter(|l| !l.is_empty()),
                // Not reported by this API
                spam_reports: 0,
            },
        }
    }
}

/// Remote phone validation client.
pub struct AbstractApiClient {
    config: AbstractApiConfig,
    client: Client,
}

impl AbstractApiClient {
    /// Create a new client with a bounded request timeout.
    pub fn new(mut config: AbstractApiConfig) -> CheckResult<Self> {
        if config.base_url.trim().is_empty() {
            config.base_url = ABSTRACTAPI_BASE_URL.to_string();
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CheckError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Validate a normalized number.
    pub async fn lookup(&self, phone: &NormalizedPhone) -> CheckResult<PhoneLookup> {
        let response = self
            .client
            .get(format!("{}/", self.config.base_url))
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("phone", phone.number.as_str()),
            ])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let lookup: PhoneLookup = response.json().await?;

        tracing::debug!(
            valid = lookup.valid,
            line_type = lookup.line_type.as_deref().unwrap_or("unknown"),
            country = lookup
                .country
                .as_ref()
                .and_then(|c| c.code.as_deref())
                .unwrap_or("unknown"),
            "AbstractAPI lookup complete"
        );

        Ok(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::phone_heuristics::normalize_phone;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lookup_from(value: serde_json::Value) -> PhoneLookup {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_mobile_is_zero_risk() {
        let lookup = lookup_from(json!({"valid": true, "type": "mobile"}));
        assert_eq!(lookup.risk_score(), 0);
    }

    #[test]
    fn test_invalid_and_voip_risk() {
        assert_eq!(lookup_from(json!({"valid": false})).risk_score(), 70);
        assert_eq!(
            lookup_from(json!({"valid": true, "type": "VoIP"})).risk_score(),
            30
        );
        assert_eq!(
            lookup_from(json!({"valid": false, "type": "voip"})).risk_score(),
            100
        );
    }

    #[test]
    fn test_verdict_defaults_unknown_fields() {
        let phone = normalize_phone("4155551234").unwrap();
        let verdict = lookup_from(json!({"valid": true, "carrier": ""})).into_verdict(&phone);

        assert_eq!(verdict.phone_number, "+14155551234");
        assert_eq!(verdict.country, "Unknown");
        assert_eq!(verdict.carrier, "Unknown");
        assert_eq!(verdict.line_type, "Unknown");
        assert_eq!(verdict.details.formatted, "+14155551234");
        assert_eq!(verdict.details.spam_reports, 0);
        assert!(verdict.is_safe());
    }

    #[tokio::test]
    async fn test_lookup_sends_key_and_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("phone", "+14155551234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "phone": "14155551234",
                "valid": true,
                "format": {"international": "+1 415-555-1234", "local": "(415) 555-1234"},
                "country": {"code": "US", "name": "United States", "prefix": "+1"},
                "location": "California",
                "type": "mobile",
                "carrier": "T-Mobile USA, Inc."
            })))
            .mount(&server)
            .await;

        let client = AbstractApiClient::new(AbstractApiConfig {
            api_key: "test-key".to_string(),
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap();

        let phone = normalize_phone("4155551234").unwrap();
        let verdict = client.lookup(&phone).await.unwrap().into_verdict(&phone);

        assert_eq!(verdict.country, "United States");
        assert_eq!(verdict.carrier, "T-Mobile USA, Inc.");
        assert_eq!(verdict.line_type, "mobile");
        assert_eq!(verdict.risk_score, 0);
        assert_eq!(verdict.details.formatted, "+1 415-555-1234");
        assert_eq!(verdict.details.location.as_deref(), Some("California"));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AbstractApiClient::new(AbstractApiConfig {
            api_key: "test-key".to_string(),
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap();

        let phone = normalize_phone("4155551234").unwrap();
        let err = client.lookup(&phone).await.unwrap_err();
        assert!(matches!(err, CheckError::UpstreamUnavailable(_)));
    }
}
