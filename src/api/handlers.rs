//! HTTP request handlers.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::types::*;
use crate::domain::{NewPhoneCheck, NewUrlCheck, PhoneCheck, UrlCheck};
use crate::error::{CheckError, CheckResult};
use crate::AppState;

/// Unwrap a JSON body, reporting a malformed one as a 400.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> CheckResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| CheckError::InvalidInput(rejection.body_text()))
}

// ==================== URL Checks ====================

/// Check a URL and record the verdict.
///
/// POST /api/check-url
#[utoipa::path(
    post,
    path = "/api/check-url",
    request_body = CheckUrlRequest,
    responses(
        (status = 200, description = "URL checked", body = CheckUrlResponse),
        (status = 400, description = "Missing or malformed URL"),
        (status = 500, description = "Reputation service or storage failure")
    ),
    tag = "url"
)]
pub async fn check_url(
    State(state): State<AppState>,
    body: Result<Json<CheckUrlRequest>, JsonRejection>,
) -> CheckResult<Json<CheckUrlResponse>> {
    let url = json_body(body)?.url.unwrap_or_default();

    let verdict = state.engine.evaluate_url(&url).await?;

    let stored = state
        .repository
        .append_url_check(&NewUrlCheck::new(url.as_str(), &verdict))
        .await?;
    tracing::debug!(id = stored.id, "URL check recorded");

    let history = state
        .repository
        .recent_url_checks(state.history_limit)
        .await?;

    Ok(Json(CheckUrlResponse::new(url, verdict, history)))
}

/// Most recent URL checks, newest first.
///
/// GET /api/url-history
#[utoipa::path(
    get,
    path = "/api/url-history",
    responses(
        (status = 200, description = "Recent URL checks", body = Vec<UrlCheck>),
        (status = 500, description = "Storage failure")
    ),
    tag = "url"
)]
pub async fn url_history(State(state): State<AppState>) -> CheckResult<Json<Vec<UrlCheck>>> {
    let history = state
        .repository
        .recent_url_checks(state.history_limit)
        .await?;
    Ok(Json(history))
}

// ==================== Phone Checks ====================

/// Check a phone number and record the verdict.
///
/// POST /api/check-phone
#[utoipa::path(
    post,
    path = "/api/check-phone",
    request_body = CheckPhoneRequest,
    responses(
        (status = 200, description = "Phone number checked", body = CheckPhoneResponse),
        (status = 400, description = "Missing number or fewer than ten digits"),
        (status = 500, description = "Validation service or storage failure")
    ),
    tag = "phone"
)]
pub async fn check_phone(
    State(state): State<AppState>,
    body: Result<Json<CheckPhoneRequest>, JsonRejection>,
) -> CheckResult<Json<CheckPhoneResponse>> {
    let raw = json_body(body)?.phone_number.unwrap_or_default();

    let verdict = state.engine.evaluate_phone(&raw).await?;

    let stored = state
        .repository
        .append_phone_check(&NewPhoneCheck::from(&verdict))
        .await?;
    tracing::debug!(id = stored.id, "Phone check recorded");

    let history = state
        .repository
        .recent_phone_checks(state.history_limit)
        .await?;

    Ok(Json(CheckPhoneResponse::new(verdict, history)))
}

/// Most recent phone checks, newest first.
///
/// GET /api/phone-history
#[utoipa::path(
    get,
    path = "/api/phone-history",
    responses(
        (status = 200, description = "Recent phone checks", body = Vec<PhoneCheck>),
        (status = 500, description = "Storage failure")
    ),
    tag = "phone"
)]
pub async fn phone_history(State(state): State<AppState>) -> CheckResult<Json<Vec<PhoneCheck>>> {
    let history = state
        .repository
        .recent_phone_checks(state.history_limit)
        .await?;
    Ok(Json(history))
}

// ==================== Health ====================

/// Health check endpoint.
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match state.repository.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let source = |remote: bool, name: &str| {
        if remote {
            name.to_string()
        } else {
            "heuristic".to_string()
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        url_reputation: source(state.engine.url_reputation_enabled(), "virustotal"),
        phone_validation: source(state.engine.phone_validation_enabled(), "abstractapi"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
