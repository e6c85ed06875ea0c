use std::fmt;

use board_module::{BoardError, BoardRecord, ColumnValues};
use chrono::{DateTime, Duration, Utc};
use thread_fetch_module::{LeadThread, ThreadSource};
use tracing::{debug, info, warn};

use crate::staleness::list_stale;
use crate::store::BoardStore;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to list board records: {0}")]
    ListRecords(#[from] BoardError),
}

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub scanned: usize,
    pub stale: usize,
    pub missing_lead: usize,
    pub fetch_failed: usize,
    pub no_thread: usize,
    pub unchanged: usize,
    pub updated: usize,
    pub update_failed: usize,
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned={} stale={} missing_lead={} fetch_failed={} no_thread={} unchanged={} updated={} update_failed={}",
            self.scanned,
            self.stale,
            self.missing_lead,
            self.fetch_failed,
            self.no_thread,
            self.unchanged,
            self.updated,
            self.update_failed
        )
    }
}

enum RecordOutcome {
    FetchFailed,
    NoThread,
    Unchanged,
    Updated,
    UpdateFailed,
}

/// Refreshes the stored conversation of stale board records.
pub struct ThreadReconciler<'a> {
    board: &'a dyn BoardStore,
    source: &'a dyn ThreadSource,
    thread_column: &'a str,
    last_contact_column: &'a str,
    max_age: Duration,
}

impl<'a> ThreadReconciler<'a> {
    pub fn new(
        board: &'a dyn BoardStore,
        source: &'a dyn ThreadSource,
        thread_column: &'a str,
        last_contact_column: &'a str,
        max_age: Duration,
    ) -> Self {
        Self {
            board,
            source,
            thread_column,
            last_contact_column,
            max_age,
        }
    }

    /// One full pass: read every record from the board and reconcile it.
    pub fn run_pass(&self, now: DateTime<Utc>) -> Result<ReconcileReport, SyncError> {
        let records = self.board.list_records()?;
        Ok(self.reconcile(&records, now))
    }

    /// Records are processed one at a time in input order. A failure on one
    /// record is logged and counted; it never stops the batch.
    pub fn reconcile(&self, records: &[BoardRecord], now: DateTime<Utc>) -> ReconcileReport {
        let scan = list_stale(records, now, self.max_age);
        let mut report = ReconcileReport {
            scanned: records.len(),
            stale: scan.stale.len(),
            missing_lead: scan.missing_lead.len(),
            ..ReconcileReport::default()
        };

        for record in &scan.missing_lead {
            warn!("item {} ({}) has no lead email, skipping", record.item_id, record.name);
        }

        for record in &scan.stale {
            match self.reconcile_record(record, now) {
                RecordOutcome::FetchFailed => report.fetch_failed += 1,
                RecordOutcome::NoThread => report.no_thread += 1,
                RecordOutcome::Unchanged => report.unchanged += 1,
                RecordOutcome::Updated => report.updated += 1,
                RecordOutcome::UpdateFailed => report.update_failed += 1,
            }
        }

        info!("thread reconciliation finished: {}", report);
        report
    }

    fn reconcile_record(&self, record: &BoardRecord, now: DateTime<Utc>) -> RecordOutcome {
        let Some(lead_email) = record.lead_email() else {
            return RecordOutcome::FetchFailed;
        };

        let thread = match self.source.fetch_thread(lead_email) {
            Ok(thread) => thread,
            Err(err) => {
                warn!("failed to fetch thread for {} (item {}): {}", lead_email, record.item_id, err);
                return RecordOutcome::FetchFailed;
            }
        };

        let text = match &thread {
            LeadThread::NoMessages => {
                debug!("no emails for {} (item {})", lead_email, record.item_id);
                return RecordOutcome::NoThread;
            }
            LeadThread::Conversation(text) => text,
        };

        if text.trim() == record.thread_text.trim() {
            debug!("thread unchanged for item {}", record.item_id);
            return RecordOutcome::Unchanged;
        }

        let mut values = ColumnValues::new();
        values
            .long_text(self.thread_column, text)
            .date(self.last_contact_column, now.date_naive());
        match self.board.update_record(&record.item_id, &values) {
            Ok(()) => {
                info!("updated thread for item {} ({})", record.item_id, lead_email);
                RecordOutcome::Updated
            }
            Err(err) => {
                warn!("failed to update item {}: {}", record.item_id, err);
                RecordOutcome::UpdateFailed
            }
        }
    }
}
