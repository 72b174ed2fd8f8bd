//! ThesisAI API Gateway
//!
//! HTTP entry point for document uploads, analysis requests and result
//! retrieval. Handles:
//! - Owner identification
//! - Request routing and body limits
//! - Observability (logging, metrics)
//! - Draining in-flight analyses on shutdown

mod extractors;
mod handlers;
mod middleware;
mod state;
#[cfg(test)]
mod testing;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thesisai_analysis::create_ai_client;
use thesisai_common::{
    config::{AppConfig, ObservabilityConfig},
    db::DbPool,
    metrics::{self, ANALYSIS_BUCKETS, METRICS_PREFIX},
    LocalBlobStore, MemoryStore, RecordStore, Repository,
};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::load()?);
    init_tracing(&config.observability);

    info!(
        service = %config.observability.service_name,
        version = thesisai_common::VERSION,
        "Starting ThesisAI gateway"
    );

    if config.observability.metrics_port != 0 {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        let analysis_latency = |name: &str| Matcher::Full(format!("{}_{}", METRICS_PREFIX, name));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .set_buckets_for_metric(analysis_latency("analysis_duration_seconds"), ANALYSIS_BUCKETS)?
            .set_buckets_for_metric(analysis_latency("ai_request_duration_seconds"), ANALYSIS_BUCKETS)?
            .install()?;
        info!(%addr, "Metrics exporter listening");
    }
    metrics::register_metrics();

    let store: Arc<dyn RecordStore> = if config.uses_memory_store() {
        warn!("Using in-memory record store; data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        let pool = DbPool::new(&config.database).await?;
        if config.database.run_migrations {
            pool.run_migrations().await?;
        }
        Arc::new(Repository::new(pool))
    };

    let blobs = Arc::new(LocalBlobStore::new(config.storage.upload_dir.clone()));
    let ai = create_ai_client(&config.ai)?;
    info!(provider = %config.ai.provider, model = ai.model_name(), "AI client ready");

    let state = AppState::new(config.clone(), store, blobs, ai);
    let app = create_router(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drain_analyses(&state, config.shutdown_timeout()).await;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logging {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Create the main application router
pub(crate) fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_upload_bytes + MULTIPART_OVERHEAD;

    let api_routes = Router::new()
        // Health endpoints (no owner)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Documents
        .route(
            "/documents",
            post(handlers::documents::upload_document).get(handlers::documents::list_documents),
        )
        .route(
            "/documents/{id}",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        )

        // Analyses
        .route("/documents/{id}/analyze", post(handlers::analyses::analyze_document))
        .route("/documents/{id}/analyses", get(handlers::analyses::list_analyses))
        .route("/documents/{id}/analyses/latest", get(handlers::analyses::latest_analysis))
        .route("/analyses/{id}", get(handlers::analyses::get_analysis))
        .route("/analyses/{id}/feedback", get(handlers::analyses::get_feedback))
        .route_layer(axum::middleware::from_fn(middleware::metrics::track_requests));

    Router::new()
        .nest("/v1", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(state.config.request_timeout()))
                .layer(cors),
        )
        .with_state(state)
}

/// Wait for running analyses to reach a terminal state, up to `timeout`
async fn drain_analyses(state: &AppState, timeout: Duration) {
    let started = Instant::now();
    loop {
        let active = state.analyses.active_runs();
        if active == 0 {
            return;
        }
        if started.elapsed() >= timeout {
            warn!(active, "Shutdown timeout reached with analyses still running");
            return;
        }
        info!(active, "Waiting for running analyses");
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
