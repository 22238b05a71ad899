//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "clipcoach_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "clipcoach_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "clipcoach_http_requests_in_flight";

    // Feedback pipeline metrics
    pub const FEEDBACK_REQUESTS_TOTAL: &str = "clipcoach_feedback_requests_total";
    pub const FEEDBACK_DURATION_SECONDS: &str = "clipcoach_feedback_duration_seconds";
    pub const ASSET_POLLS: &str = "clipcoach_asset_polls";

    // Access gate
    pub const ACCESS_ATTEMPTS_TOTAL: &str = "clipcoach_access_attempts_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "clipcoach_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the outcome of one feedback run (`ok` or an error kind).
pub fn record_feedback(game: &str, outcome: &str, duration_secs: f64) {
    let labels = [("game", game.to_string()), ("outcome", outcome.to_string())];
    counter!(names::FEEDBACK_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::FEEDBACK_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record how many state checks an asset needed before it was ready.
pub fn record_asset_polls(polls: u32) {
    histogram!(names::ASSET_POLLS).record(f64::from(polls));
}

/// Record an unlock attempt (`granted` or `denied`).
pub fn record_access_attempt(result: &str) {
    let labels = [("result", result.to_string())];
    counter!(names::ACCESS_ATTEMPTS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint).to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Collapse paths to the known route set so label cardinality stays bounded.
fn sanitize_path(path: &str) -> &'static str {
    match path.trim_end_matches('/') {
        "" => "/",
        "/health" => "/health",
        "/healthz" => "/healthz",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        "/api/games" => "/api/games",
        "/api/access" => "/api/access",
        "/api/feedback" => "/api/feedback",
        _ => "/other",
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
