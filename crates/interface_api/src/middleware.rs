//! API middleware

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use chrono::Utc;
use tracing::{info, warn};

/// Logs each ledger API call once it has been answered
///
/// Server errors are logged at `warn`; everything else at `info`.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let started = Utc::now();
    let response = next.run(request).await;
    let duration_ms = (Utc::now() - started).num_milliseconds();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(%method, %path, %request_id, status, duration_ms, "ledger request failed");
    } else {
        info!(%method, %path, %request_id, status, duration_ms, "ledger request");
    }

    response
}
