//! TriggerDeck -- operator console for webhook-triggered automation workflows.
//!
//! This crate provides the trigger dispatch engine: per-workflow controllers
//! with a busy guard and cool-down, a bounded execution ledger, running
//! statistics, and the HTTP API that exposes them.

pub mod api;
pub mod config;
pub mod console;
pub mod controller;
pub mod dispatch;
pub mod execution;
pub mod metrics;
pub mod workflow;

use anyhow::{Context, Result};

pub use self::console::Console;
pub use self::workflow::WorkflowKind;

/// Start the TriggerDeck daemon: console state plus the operator API.
pub async fn serve(bind: &str, config: &config::Config) -> Result<()> {
    // 1. Initialize console state
    let console = Console::from_config(&config.workflows).await?;
    for kind in WorkflowKind::ALL {
        let state = console.state(kind).await;
        tracing::info!(
            workflow = %kind,
            configured = !state.webhook_endpoint.is_empty(),
            "Workflow controller ready"
        );
    }

    // 2. Start API Server
    let addr: std::net::SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind))?;
    let app = api::router(api::state::AppState::new(console));

    tracing::info!(%addr, "TriggerDeck listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("TriggerDeck stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
