//! Keeps a Monday board in step with Instantly outreach: refreshes stale
//! conversation threads in batch and applies webhook events as they arrive.

pub mod config;
pub mod event;
pub mod ingest;
pub mod reconcile;
pub mod service;
pub mod staleness;
pub mod store;
mod timestamps;

pub use config::{
    BoardConfig, ConfigError, OutreachConfig, SyncConfig, ThreadUpdatePolicy, WebhookConfig,
};
pub use event::{CampaignCompletedEvent, EmailSentEvent, Event, EventError};
pub use ingest::{EventIngestor, IngestError, IngestResult};
pub use reconcile::{ReconcileReport, SyncError, ThreadReconciler};
pub use staleness::{is_stale, list_stale, StaleScan};
pub use store::{BoardStore, MondayBoardStore};
pub use timestamps::parse_timestamp;
