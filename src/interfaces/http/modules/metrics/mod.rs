//! Prometheus metrics endpoint and HTTP metrics middleware

pub mod handlers;
pub mod middleware;

pub use handlers::*;
pub use middleware::http_metrics_middleware;

/// Register descriptions for every metric this service emits.
pub fn describe_metrics() {
    metrics::describe_counter!("http_requests_total", "HTTP requests by method, path and status");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency"
    );
    metrics::describe_counter!("settings_cache_hits_total", "Cache hits by region");
    metrics::describe_counter!("settings_cache_misses_total", "Cache misses by region");
}
