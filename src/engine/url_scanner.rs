//! URL heuristics - format validation and red-flag scanning.
//!
//! The scanner is the local fallback used when no remote reputation
//! service answers. It is pure: every rule is a regex over the raw URL
//! string and every matching rule contributes its reason.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::UrlVerdict;
use crate::error::{CheckError, CheckResult};

/// Accepted URL shape: scheme, dotted host with an alphabetic TLD, optional path.
static URL_FORMAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r"^(http|https)://[A-Za-z0-9_.\-]+\.[A-Za-z]{2,}(/.*)?$")
});

/// One red-flag rule.
struct UrlRule {
    pattern: Regex,
    reason: &'static str,
}

/// Rules in reporting order. Every match is reported, none short-circuits.
static URL_RULES: LazyLock<Vec<UrlRule>> = LazyLock::new(|| {
    [
        (r"\.(xyz|tk|ml|ga|cf|gq|pw)/", "Suspicious TLD"),
        (
            r"(login|signin|account|secure|security|verify|verification)",
            "Potential phishing keywords",
        ),
        (r"[0-9a-f]{32}", "Suspicious random string"),
        (
            r"\.(exe|bin|dll|scr|bat|cmd|msi)$",
            "Suspicious file extension",
        ),
        (r"^http://", "Insecure protocol (HTTP)"),
        (r"^https?://\d+\.\d+\.\d+\.\d+", "IP address in URL"),
        (r"@", "URL contains @ symbol"),
        (r"bitly|tinyurl|goo\.gl|t\.co|bit\.ly", "URL shortener"),
    ]
    .into_iter()
    .map(|(pattern, reason)| UrlRule {
        pattern: compile_regex(pattern),
        reason,
    })
    .collect()
});

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Covered by the `patterns_compile` test
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

/// Validate a user-supplied URL before it is checked.
pub fn validate_url(url: &str) -> CheckResult<&str> {
    if url.is_empty() {
        return Err(CheckError::InvalidInput("URL is required".to_string()));
    }

    if !URL_FORMAT_REGEX.is_match(url) {
        return Err(CheckError::InvalidInput("Invalid URL format".to_string()));
    }

    Ok(url)
}

/// Regex-based red-flag scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlScanner;

impl UrlScanner {
    pub fn new() -> Self {
        Self
    }

    /// Reasons for every rule the URL trips, in rule order.
    pub fn red_flags(&self, url: &str) -> Vec<&'static str> {
        URL_RULES
            .iter()
            .filter(|rule| rule.pattern.is_match(url))
            .map(|rule| rule.reason)
            .collect()
    }

    /// Produce a verdict from the red flags alone.
    pub fn scan(&self, url: &str) -> UrlVerdict {
        UrlVerdict::from_reasons(&self.red_flags(url))
    }
}
