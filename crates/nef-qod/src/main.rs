mod args;
mod handlers;
mod metrics;
mod state;

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use clap::Parser;

use nef_qod::QodSessionService;

use crate::args::Args;
use crate::handlers::{create_qod_session, healthz};
use crate::metrics::{metrics_handler, track_requests};
use crate::state::AppState;

pub(crate) fn build_router(st: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/health", get(healthz))
        .route("/metrics", get(metrics_handler))
        .route("/qod/v1/sessions", post(create_qod_session))
        .layer(middleware::from_fn_with_state(st.clone(), track_requests))
        .with_state(st)
}

/// Serves until `shutdown` resolves, then lets in-flight requests finish.
async fn serve_until(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received; draining connections");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let otel_guard = nef_common::telemetry::init_tracing(
        "nef-qod",
        args.xtrace_url.as_deref(),
        args.xtrace_token.as_deref(),
        &args.log_format,
    );

    let config = args.qod_config()?;
    tracing::info!(
        listen_addr = %args.listen_addr,
        nrf_url = %config.registry.base_url,
        pcf_qod_url = config.policy_control_url.as_deref().unwrap_or(""),
        profiles = config.catalog.profiles.len(),
        "nef-qod starting"
    );
    if !config.forwarding_enabled() {
        tracing::warn!("PCF_QOD_URL not set; qod sessions will not be forwarded");
    }

    let sessions = QodSessionService::from_config(&config)?;

    let st = AppState {
        sessions: Arc::new(sessions),
        metrics: Arc::new(metrics::Metrics::default()),
    };

    let listener = tokio::net::TcpListener::bind(&args.listen_addr).await?;
    serve_until(listener, build_router(st), shutdown_signal()).await?;

    if let Some(provider) = otel_guard {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "failed to flush traces");
        }
    }
    Ok(())
}
