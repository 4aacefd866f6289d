//! Catalog Moderator - moderation dashboard for the mini-app catalog
//!
//! Loads pending apps and catalog statistics from the admin API, lets an
//! operator approve or reject apps and manage the developer allow-list, and
//! serves the resulting view to the chat host's webview.

pub mod backend;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod host;
pub mod io;
pub mod model;
pub mod notice;
pub mod state;
pub mod view;

pub use config::{load_config, Config};
pub use controller::Controller;
pub use error::{ModeratorError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::backend::{AdminBackend, BackendClient};
use crate::io::ReqwestHttpClient;
use crate::notice::NoticePolicy;

/// Wire the backend client, state and controller from configuration
pub fn build_controller(config: &Config) -> Result<Controller> {
    let host = config.host.context();
    let http = ReqwestHttpClient::with_timeout(Duration::from_secs(
        config.backend.request_timeout_seconds,
    ))?;
    let backend: Arc<dyn AdminBackend> = Arc::new(BackendClient::new(
        &config.backend.base_url,
        &host,
        Arc::new(http),
    ));
    let policy = NoticePolicy {
        show_stats_failures: config.dashboard.show_stats_failures,
    };
    let state = state::new_state_handle(config.dashboard.notice_history_size, policy);

    Ok(Controller::new(backend, host, state))
}

/// Run the moderation dashboard with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let controller = build_controller(&config)?;
    let cancel = CancellationToken::new();

    if !controller.host().embedded() {
        tracing::warn!("Not running inside the chat host; the dashboard will only show an error");
    }

    // Initial load happens once; the host context cannot change afterwards
    controller.load().await;

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
        cancel_for_signal.cancel();
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        ModeratorError::Config(format!(
            "Failed to bind dashboard to port {}: {}",
            config.dashboard.port, e
        ))
    })?;
    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, dashboard::build_router(controller))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("Dashboard stopped");
    Ok(())
}
