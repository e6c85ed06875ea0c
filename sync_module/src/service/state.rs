use std::sync::Arc;

use thread_fetch_module::ThreadSource;

use crate::config::SyncConfig;
use crate::store::BoardStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SyncConfig>,
    pub board: Arc<dyn BoardStore + Send + Sync>,
    pub source: Arc<dyn ThreadSource + Send + Sync>,
}

impl AppState {
    pub fn new(
        config: SyncConfig,
        board: Arc<dyn BoardStore + Send + Sync>,
        source: Arc<dyn ThreadSource + Send + Sync>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            board,
            source,
        }
    }
}
