//! Server startup: shared state initialization and the serve loop.

use std::sync::Arc;

use pooltask_core::Config;
use pooltask_notify::WebhookNotifier;
use pooltask_pool::WorkerPool;
use tracing::{info, warn};

use crate::router;
use crate::state::AppState;

/// Build `AppState`: a pool posting completions to the configured callback URL.
pub fn build_app_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    config.validate()?;

    let notifier = WebhookNotifier::new(&config.callback.url, config.callback.timeout())?;
    info!("Callback notifier ready (url: {})", notifier.url());

    let pool = WorkerPool::from_config(&config.pool, Arc::new(notifier))?;
    info!("Worker pool ready (max_workers: {})", pool.max_workers());

    Ok(Arc::new(AppState { pool }))
}

/// Serve until Ctrl-C. In-flight tasks are not cancelled by shutdown.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    config.log_summary();
    let state = build_app_state(config)?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.addr()).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
