//! CORS policy for the browser frontend.
//!
//! The login page posts the Google credential cross-origin, so only the
//! configured frontend origins are allowed, with credentials.
//!
//! Policy:
//! - Exact-match allowlist from `ALLOWED_ORIGINS` (comma-separated).
//! - An empty allowlist allows no origin at all.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

/// Apply CORS policy to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(&config.allowed_origins))
}

fn layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| match HeaderValue::from_str(s) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %s, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    // Credentials rule out a wildcard origin, so the list is always explicit.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10))
}
