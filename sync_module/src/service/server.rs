use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::task;
use tracing::info;

use crate::config::SyncConfig;
use crate::store::MondayBoardStore;

use super::handlers::{health, ingest_webhook};
use super::state::AppState;
use super::BoxError;

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.webhook.body_max_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(ingest_webhook))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

pub async fn run_server(
    config: SyncConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), BoxError> {
    let board_config = config.board.clone();
    let outreach_config = config.outreach.clone();
    let (board, source) = task::spawn_blocking(move || {
        (
            MondayBoardStore::from_config(&board_config),
            outreach_config.client(),
        )
    })
    .await
    .map_err(|err| -> BoxError { err.into() })?;

    let host: IpAddr = config
        .webhook
        .host
        .parse()
        .map_err(|_| format!("invalid host: {}", config.webhook.host))?;
    let addr = SocketAddr::new(host, config.webhook.port);

    if config.webhook.token.is_none() {
        info!("webhook token not configured, accepting unauthenticated events");
    }
    let state = AppState::new(config, Arc::new(board), Arc::new(source));

    info!("outreach webhook listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
