//! Service middleware for request metrics.
//!
//! ## Metrics Exposed
//!
//! - `request` - Request count by path pattern, method, status and latency
//! - `export` - Export count by format and size
//! - `import` - Import outcomes with node and edge counts

use std::sync::OnceLock;
use std::time::Instant;

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use regex_lite::Regex;
use tracing::info;

/// Metrics middleware that records request counts and latency.
///
/// Uses tracing events, aggregated from logs.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "mindmap_kernel::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

fn node_segment_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/nodes/[^/]+").ok()).as_ref()
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Replaces node ids with a placeholder.
fn normalize_path(path: &str) -> String {
    match node_segment_pattern() {
        Some(pattern) => pattern.replace_all(path, "/nodes/:id").to_string(),
        None => path.to_string(),
    }
}

/// Record an export.
pub fn record_export(format: &str, bytes: usize) {
    info!(
        target: "mindmap_kernel::metrics",
        metric_type = "export",
        format = format,
        bytes = bytes,
        "export_metric"
    );
}

/// Record an import attempt.
pub fn record_import(success: bool, nodes: usize, edges: usize) {
    let status = if success { "success" } else { "error" };
    info!(
        target: "mindmap_kernel::metrics",
        metric_type = "import",
        status = status,
        nodes = nodes,
        edges = edges,
        "import_metric"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_replaces_node_id() {
        assert_eq!(normalize_path("/api/nodes/42/children"), "/api/nodes/:id/children");
        assert_eq!(normalize_path("/api/nodes/abc"), "/api/nodes/:id");
    }

    #[test]
    fn test_normalize_path_preserves_regular_path() {
        assert_eq!(normalize_path("/health/live"), "/health/live");
        assert_eq!(normalize_path("/api/nodes"), "/api/nodes");
    }
}
