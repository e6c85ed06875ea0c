//! Lead conversation fetching for the Instantly outreach API.
//!
//! `InstantlyClient` lists a lead's emails, groups them into threads and
//! renders the whole conversation as deterministic plain text. The rendered
//! text is what gets stored on the board, so identical upstream data must
//! always produce identical output.

mod client;
mod error;
mod message;
mod render;

pub use client::{InstantlyClient, DEFAULT_INSTANTLY_API_BASE_URL, MESSAGE_PAGE_LIMIT};
pub use error::FetchError;
pub use message::{extract_message_list, Message, MESSAGE_LIST_KEYS, NO_THREAD_ID};
pub use render::{
    group_into_threads, render_threads, LeadThread, Thread, MESSAGE_SEPARATOR, THREAD_SEPARATOR,
};

/// Anything that can produce a lead's current conversation.
///
/// The reconciler and the event ingestor only depend on this trait, so they
/// can run against fixtures instead of the live API.
pub trait ThreadSource {
    fn fetch_thread(&self, lead_email: &str) -> Result<LeadThread, FetchError>;
}
