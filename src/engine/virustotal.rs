//! URL reputation lookups against the VirusTotal v3 API.
//!
//! A lookup is two calls: submit the URL for analysis, then fetch the
//! analysis by id and read its vendor statistics. Neither call is retried.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::VendorStats;
use crate::error::{CheckError, CheckResult};

/// Public API endpoint.
pub const VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com/api/v3";

/// VirusTotal client configuration.
#[derive(Debug, Clone)]
pub struct VirusTotalConfig {
    pub api_key: String,
    /// API root without trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

/// `POST /urls` response.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    data: SubmitData,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    id: String,
}

/// `GET /analyses/{id}` response.
#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    data: AnalysisData,
}

#[derive(Debug, Deserialize)]
struct AnalysisData {
    attributes: AnalysisAttributes,
}

#[derive(Debug, Deserialize)]
struct AnalysisAttributes {
    #[serde(default)]
    status: Option<String>,
    stats: AnalysisStats,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalysisStats {
    malicious: u32,
    suspicious: u32,
    undetected: u32,
    harmless: u32,
    timeout: u32,
}

impl From<AnalysisStats> for VendorStats {
    fn from(stats: AnalysisStats) -> Self {
        VendorStats {
            // Counts come from the wire, so the sum saturates
            total: [stats.suspicious, stats.undetected, stats.harmless, stats.timeout]
                .into_iter()
                .fold(stats.malicious, u32::saturating_add),
            malicious: stats.malicious,
            suspicious: stats.suspicious,
            undetected: stats.undetected,
        }
    }
}

/// Remote URL reputation client.
pub struct VirusTotalClient {
    config: VirusTotalConfig,
    client: Client,
}

impl VirusTotalClient {
    /// Create a new client with a bounded request timeout.
    pub fn new(mut config: VirusTotalConfig) -> CheckResult<Self> {
        if config.base_url.trim().is_empty() {
            config.base_url = VIRUSTOTAL_BASE_URL.to_string();
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CheckError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Submit a URL and read the vendor counts of its analysis.
    pub async fn analyze(&self, url: &str) -> CheckResult<VendorStats> {
        let analysis_id = self.submit(url).await?;
        tracing::debug!(analysis_id = %analysis_id, "VirusTotal analysis submitted");

        let response = self
            .client
            .get(format!("{}/analyses/{}", self.config.base_url, analysis_id))
            .header("accept", "application/json")
            .header("x-apikey", &self.config.api_key)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let analysis: AnalysisResponse = response.json().await?;

        let attributes = analysis.data.attributes;
        tracing::debug!(
            status = attributes.status.as_deref().unwrap_or("unknown"),
            malicious = attributes.stats.malicious,
            suspicious = attributes.stats.suspicious,
            "VirusTotal analysis fetched"
        );

        Ok(attributes.stats.into())
    }

    async fn submit(&self, url: &str) -> CheckResult<String> {
        let response = self
            .client
            .post(format!("{}/urls", self.config.base_url))
            .header("accept", "application/json")
            .header("x-apikey", &self.config.api_key)
            .form(&[("url", url)])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let submitted: SubmitResponse = response.json().await?;
        Ok(submitted.data.id)
    }
}

/// Turn a non-2xx response into `UpstreamUnavailable`.
pub(crate) async fn ensure_success(response: reqwest::Response) -> CheckResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CheckError::UpstreamUnavailable(format!(
        "API error {}: {}",
        status, body
    )))
}
