//! Verdict Engine - picks between remote reputation and local heuristics.
//!
//! Each check prefers the remote service. When the service has no API key,
//! or the call fails, the engine falls back to the local heuristic unless
//! fallback is disabled, in which case the failure is returned as is.

use crate::config::ReputationConfig;
use crate::domain::{PhoneVerdict, UrlVerdict};
use crate::engine::{
    normalize_phone, validate_url, AbstractApiClient, AbstractApiConfig, PhoneHeuristics,
    RandomSource, UrlScanner, VirusTotalClient, VirusTotalConfig,
};
use crate::error::{CheckError, CheckResult};

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictSource {
    Remote,
    Heuristic,
}

impl std::fmt::Display for VerdictSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictSource::Remote => write!(f, "remote"),
            VerdictSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Produces URL and phone verdicts.
pub struct VerdictEngine {
    url_reputation: Option<VirusTotalClient>,
    phone_validation: Option<AbstractApiClient>,
    scanner: UrlScanner,
    phone_heuristics: PhoneHeuristics,
    heuristic_fallback: bool,
}

impl VerdictEngine {
    /// Create an engine from already-built collaborators.
    pub fn new(
        url_reputation: Option<VirusTotalClient>,
        phone_validation: Option<AbstractApiClient>,
        phone_heuristics: PhoneHeuristics,
        heuristic_fallback: bool,
    ) -> Self {
        Self {
            url_reputation,
            phone_validation,
            scanner: UrlScanner::new(),
            phone_heuristics,
            heuristic_fallback,
        }
    }

    /// Build the engine, creating a client for every service with an API key.
    pub fn from_config(
        config: &ReputationConfig,
        random: Box<dyn RandomSource>,
    ) -> CheckResult<Self> {
        let url_reputation = if config.virustotal.is_configured() {
            Some(VirusTotalClient::new(VirusTotalConfig {
                api_key: config.virustotal.api_key.clone(),
                base_url: config.virustotal.base_url.clone(),
                timeout_secs: config.timeout_secs,
            })?)
        } else {
            None
        };

        let phone_validation = if config.abstractapi.is_configured() {
            Some(AbstractApiClient::new(AbstractApiConfig {
                api_key: config.abstractapi.api_key.clone(),
                base_url: config.abstractapi.base_url.clone(),
                timeout_secs: config.timeout_secs,
            })?)
        } else {
            None
        };

        Ok(Self::new(
            url_reputation,
            phone_validation,
            PhoneHeuristics::new(random),
            config.heuristic_fallback,
        ))
    }

    pub fn url_reputation_enabled(&self) -> bool {
        self.url_reputation.is_some()
    }

    pub fn phone_validation_enabled(&self) -> bool {
        self.phone_validation.is_some()
    }

    /// Evaluate a URL.
    ///
    /// Fails with `InvalidInput` when the URL is empty or malformed.
    pub async fn evaluate_url(&self, url: &str) -> CheckResult<UrlVerdict> {
        let url = validate_url(url)?;

        let (verdict, source) = match &self.url_reputation {
            Some(client) => match client.analyze(url).await {
                Ok(stats) => (UrlVerdict::from_stats(stats), VerdictSource::Remote),
                Err(e) if self.heuristic_fallback => {
                    tracing::warn!(error = %e, "VirusTotal lookup failed, using URL heuristics");
                    (self.scanner.scan(url), VerdictSource::Heuristic)
                }
                Err(e) => return Err(e),
            },
            None if self.heuristic_fallback => (self.scanner.scan(url), VerdictSource::Heuristic),
            None => {
                return Err(CheckError::Config(
                    "VirusTotal API key not configured".to_string(),
                ))
            }
        };

        tracing::info!(
            url = %url,
            source = %source,
            is_safe = verdict.is_safe,
            result = %verdict.result,
            "URL verdict"
        );

        Ok(verdict)
    }

    /// Evaluate a phone number.
    ///
    /// Fails with `InvalidInput` when the number is empty or has fewer than ten digits.
    pub async fn evaluate_phone(&self, raw: &str) -> CheckResult<PhoneVerdict> {
        let phone = normalize_phone(raw)?;

        let (verdict, source) = match &self.phone_validation {
            Some(client) => match client.lookup(&phone).await {
                Ok(lookup) => (lookup.into_verdict(&phone), VerdictSource::Remote),
                Err(e) if self.heuristic_fallback => {
                    tracing::warn!(error = %e, "AbstractAPI lookup failed, using phone heuristics");
                    (self.phone_heuristics.assess(&phone), VerdictSource::Heuristic)
                }
                Err(e) => return Err(e),
            },
            None if self.heuristic_fallback => {
                (self.phone_heuristics.assess(&phone), VerdictSource::Heuristic)
            }
            None => {
                return Err(CheckError::Config(
                    "AbstractAPI API key not configured".to_string(),
                ))
            }
        };

        tracing::info!(
            phone_number = %verdict.phone_number,
            source = %source,
            risk_score = verdict.risk_score,
            is_safe = verdict.is_safe(),
            "Phone verdict"
        );

        Ok(verdict)
    }
}
