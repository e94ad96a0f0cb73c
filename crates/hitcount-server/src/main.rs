//! hitcount server
//!
//! - Counter routes: /hit, /count, /count.txt, /badge, /badge.json
//! - Ops routes: /healthz, /readyz, /metrics
//! - Config: YAML file + env overrides (see `config`)
//! - Graceful shutdown on SIGINT/SIGTERM, bounded by `server.shutdown_grace_ms`

use std::future::IntoFuture;
use std::process::ExitCode;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing_subscriber::{fmt, EnvFilter};

use hitcount_core::error::{HitError, Result};
use hitcount_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => {
            tracing::info!("bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "hitcount-server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load()?;
    let listen = cfg.server.listen_addr()?;
    let grace = Duration::from_millis(cfg.server.shutdown_grace_ms);

    let state = AppState::new(cfg)?;

    if state.cfg().store.require_backend && !state.counters().warm_up().await {
        return Err(HitError::Config(
            "store.require_backend is set but the durable backend is unreachable".into(),
        ));
    }

    let app = router::build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| HitError::Internal(format!("bind {listen} failed: {e}")))?;

    tracing::info!(%listen, backend = state.counters().backend_state().as_str(), "hitcount-server listening");

    let (stop_tx, stop_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone(), stop_tx))
        .into_future();

    // in-flight requests get `grace` after the signal, then are dropped
    let deadline = async {
        if stop_rx.await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        res = server => res.map_err(|e| HitError::Internal(format!("server failed: {e}"))),
        _ = deadline => {
            tracing::warn!(grace_ms = grace.as_millis() as u64, "graceful shutdown timed out");
            Ok(())
        }
    }
}

async fn shutdown_signal(state: AppState, stop_tx: oneshot::Sender<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
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

    tracing::info!("shutting down...");
    state.metrics().set_draining();
    let _ = stop_tx.send(());
}
