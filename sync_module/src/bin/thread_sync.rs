//! One reconciliation pass over the board. Scheduling is left to cron or
//! whatever runs this binary.

use chrono::Utc;
use sync_module::config::SyncConfig;
use sync_module::reconcile::ThreadReconciler;
use sync_module::store::MondayBoardStore;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_target(false).init();
    dotenvy::dotenv().ok();

    let config = SyncConfig::from_env()?;
    let board = MondayBoardStore::from_config(&config.board);
    let source = config.outreach.client();
    let reconciler = ThreadReconciler::new(
        &board,
        &source,
        &config.board.layout.columns.thread,
        &config.board.layout.columns.last_contact,
        config.max_age,
    );

    info!(
        "thread sync starting board={} max_age_hours={}",
        config.board.layout.board_id,
        config.max_age.num_hours()
    );
    match reconciler.run_pass(Utc::now()) {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        Err(err) => {
            error!("thread sync aborted: {}", err);
            Err(err.into())
        }
    }
}
