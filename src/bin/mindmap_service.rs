//! Serves one in-memory mind map editor over HTTP.
//!
//! Logs are JSON unless `LOG_FORMAT=pretty`. Every request carries an id
//! and the server drains in-flight requests on Ctrl+C or SIGTERM.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PORT`: Service port (default: 8002)
//! - `HOST`: Service host (default: 0.0.0.0)
//! - `MINDMAP_SEED`: Optional `.json` map imported at startup
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! LOG_FORMAT=pretty cargo run --bin mindmap_service --features service
//! ```

use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mindmap_kernel::service::{create_router, metrics_middleware, AppState, ServiceConfig};
use mindmap_kernel::InMemoryGraphStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mindmap_service=info,mindmap_kernel=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("pretty") => registry.with(tracing_subscriber::fmt::layer()).init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init(),
    }
}

/// Tags every request with an id (the caller's `X-Request-Id` or a fresh
/// v4 uuid) and logs one access line when it completes.
async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get("X-Request-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let span = info_span!("request", request_id = %request_id);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            target: "mindmap_service::access",
            %method,
            %path,
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "request completed"
        )
    });
    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    let build_sha = option_env!("BUILD_SHA").unwrap_or("dev");

    info!(
        version = version,
        build_sha = build_sha,
        "Starting Mind Map Service"
    );

    let config = ServiceConfig::from_env();
    let addr = config.listen_addr()?;

    let state = AppState::new(InMemoryGraphStore::new());
    if state.load_seed(&config)? {
        let editor = state.editor.lock();
        let snapshot = editor.snapshot();
        info!(
            seed = ?config.seed,
            nodes = snapshot.graph.nodes.len(),
            edges = snapshot.graph.edges.len(),
            "Seed map loaded"
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!(
        address = %addr,
        version = version,
        "Mind Map Service listening"
    );

    let listener = TcpListener::bind(addr).await?;

    info!("Ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Mind Map Service shutdown complete");

    Ok(())
}
