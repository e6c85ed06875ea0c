//! Monday board access over the GraphQL API.
//!
//! The board is the only durable state in the sync: each item holds a lead,
//! the last rendered conversation and the date it was last synchronized.

mod client;
mod columns;
mod error;
mod item;
mod queries;
mod record;

pub use client::{MondayClient, DEFAULT_MONDAY_API_URL, ITEMS_PAGE_LIMIT};
pub use columns::ColumnValues;
pub use error::BoardError;
pub use item::{BoardItem, ColumnValue};
pub use record::{BoardColumns, BoardLayout, BoardRecord, LeadColumn, LeadColumnKind};
