//! Route definitions for the API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::check_url,
        handlers::url_history,
        handlers::check_phone,
        handlers::phone_history,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::CheckUrlRequest,
        crate::api::types::CheckUrlResponse,
        crate::api::types::CheckPhoneRequest,
        crate::api::types::CheckPhoneResponse,
        crate::api::types::HealthResponse,
        crate::domain::UrlCheck,
        crate::domain::VendorStats,
        crate::domain::PhoneCheck,
        crate::domain::PhoneDetails,
    )),
    tags(
        (name = "url", description = "URL reputation checks"),
        (name = "phone", description = "Phone number risk checks"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Cyberfort Core API",
        version = "0.1.0",
        description = "Checks URLs and phone numbers for fraud indicators and keeps a history of verdicts",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // URL checks
        .route("/api/check-url", post(handlers::check_url))
        .route("/api/url-history", get(handlers::url_history))
        // Phone checks
        .route("/api/check-phone", post(handlers::check_phone))
        .route("/api/phone-history", get(handlers::phone_history))
        // Health
        .route("/api/health", get(handlers::health_check))
        .with_state(state)
        // OpenAPI docs
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/check-url",
            "/api/url-history",
            "/api/check-phone",
            "/api/phone-history",
            "/api/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
