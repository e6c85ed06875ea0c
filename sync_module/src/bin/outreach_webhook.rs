use sync_module::config::SyncConfig;
use sync_module::service::run_server;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_target(false).init();
    dotenvy::dotenv().ok();

    let config = SyncConfig::from_env()?;
    info!(
        "outreach webhook board={} policy={:?}",
        config.board.layout.board_id, config.update_policy
    );

    run_server(config, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
    })
    .await
}
