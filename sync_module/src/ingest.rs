use board_module::{BoardColumns, BoardError, BoardRecord, ColumnValues, LeadColumnKind};
use chrono::{DateTime, Utc};
use thread_fetch_module::{FetchError, LeadThread, ThreadSource, THREAD_SEPARATOR};
use tracing::info;

use crate::config::ThreadUpdatePolicy;
use crate::event::{CampaignCompletedEvent, EmailSentEvent, Event, CAMPAIGN_COMPLETED, EMAIL_SENT};
use crate::store::BoardStore;
use crate::timestamps::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestResult {
    Ignored { event_type: String },
    Updated { item_id: String },
    Created { item_id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    #[error("thread fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("board update failed: {0}")]
    Board(#[from] BoardError),
}

/// Applies inbound outreach events to the board.
pub struct EventIngestor<'a> {
    board: &'a dyn BoardStore,
    source: &'a dyn ThreadSource,
    columns: &'a BoardColumns,
    policy: ThreadUpdatePolicy,
}

impl<'a> EventIngestor<'a> {
    pub fn new(
        board: &'a dyn BoardStore,
        source: &'a dyn ThreadSource,
        columns: &'a BoardColumns,
        policy: ThreadUpdatePolicy,
    ) -> Self {
        Self {
            board,
            source,
            columns,
            policy,
        }
    }

    pub fn handle_event(&self, event: &Event, now: DateTime<Utc>) -> Result<IngestResult, IngestError> {
        match event {
            Event::EmailSent(sent) => self.handle_email_sent(sent, now),
            Event::CampaignCompleted(done) => self.handle_campaign_completed(done, now),
            Event::Other { event_type } => {
                info!("ignoring outreach event {}", event_type);
                Ok(IngestResult::Ignored {
                    event_type: event_type.clone(),
                })
            }
        }
    }

    fn handle_email_sent(&self, sent: &EmailSentEvent, now: DateTime<Utc>) -> Result<IngestResult, IngestError> {
        let lead_email = sent.lead_email.trim();
        if lead_email.is_empty() {
            return Err(IngestError::InvalidEvent("email_sent without lead_email".to_string()));
        }
        let contacted_at = event_time(sent.timestamp.as_deref(), now);

        let existing = self.board.find_record_by_lead(lead_email)?;
        let thread = self.source.fetch_thread(lead_email)?;

        match existing {
            Some(record) => {
                let mut values = ColumnValues::new();
                values.date_time(&self.columns.last_contact, contacted_at);
                if let Some(text) = self.updated_thread_text(&record, &thread) {
                    values.long_text(&self.columns.thread, &text);
                }
                self.board.update_record(&record.item_id, &values)?;
                info!("email_sent updated item {} for {}", record.item_id, lead_email);
                Ok(IngestResult::Updated {
                    item_id: record.item_id,
                })
            }
            None => {
                let values = self.new_lead_values(sent, lead_email, &thread, contacted_at);
                let item_name = sent.full_name().unwrap_or_else(|| lead_email.to_string());
                let item_id = self.board.create_record(&item_name, &values)?;
                info!("email_sent created item {} for {}", item_id, lead_email);
                Ok(IngestResult::Created { item_id })
            }
        }
    }

    fn handle_campaign_completed(
        &self,
        done: &CampaignCompletedEvent,
        now: DateTime<Utc>,
    ) -> Result<IngestResult, IngestError> {
        let finished_at = event_time(done.timestamp.as_deref(), now);
        let mut values = ColumnValues::new();
        if let Some(column) = &self.columns.campaign {
            values.text(column, done.item_name());
        }
        if let Some(column) = &self.columns.event_type {
            values.text(column, CAMPAIGN_COMPLETED);
        }
        values.date(&self.columns.last_contact, finished_at.date_naive());

        let item_id = self.board.create_record(done.item_name(), &values)?;
        info!("campaign_completed created item {}", item_id);
        Ok(IngestResult::Created { item_id })
    }

    /// `None` leaves the stored thread alone.
    fn updated_thread_text(&self, record: &BoardRecord, thread: &LeadThread) -> Option<String> {
        let LeadThread::Conversation(fetched) = thread else {
            return None;
        };
        match self.policy {
            ThreadUpdatePolicy::Replace => Some(fetched.clone()),
            ThreadUpdatePolicy::Append => {
                let stored = record.thread_text.trim();
                if stored.is_empty() {
                    Some(fetched.clone())
                } else if stored.ends_with(fetched.trim()) {
                    None
                } else {
                    Some(format!("{}{}{}", stored, THREAD_SEPARATOR, fetched))
                }
            }
        }
    }

    fn new_lead_values(
        &self,
        sent: &EmailSentEvent,
        lead_email: &str,
        thread: &LeadThread,
        contacted_at: DateTime<Utc>,
    ) -> ColumnValues {
        let columns = self.columns;
        let mut values = ColumnValues::new();
        match columns.lead_kind {
            LeadColumnKind::Email => values.email(&columns.lead_email, lead_email),
            LeadColumnKind::Text => values.text(&columns.lead_email, lead_email),
        };

        let optional_text = [
            (&columns.first_name, sent.first_name.as_deref()),
            (&columns.last_name, sent.last_name.as_deref()),
            (&columns.company, sent.company_name.as_deref()),
            (&columns.title, sent.job_title.as_deref()),
            (&columns.sender_account, sent.email_account.as_deref()),
            (&columns.event_type, Some(EMAIL_SENT)),
            (
                &columns.campaign,
                sent.campaign_name.as_deref().or(sent.campaign_id.as_deref()),
            ),
        ];
        for (column, text) in optional_text {
            if let (Some(column), Some(text)) = (column, text) {
                values.text(column, text);
            }
        }
        if let (Some(column), Some(url)) = (&columns.linkedin, sent.linkedin.as_deref()) {
            values.link(column, url, url);
        }

        values
            .date_time(&columns.last_contact, contacted_at)
            .long_text(&columns.thread, thread.text());
        values
    }
}

fn event_time(timestamp: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.and_then(parse_timestamp).unwrap_or(now)
}
