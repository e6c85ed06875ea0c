use board_module::BoardRecord;
use chrono::{DateTime, Duration, Utc};

use crate::timestamps::parse_timestamp;

pub const DEFAULT_MAX_AGE_DAYS: i64 = 2;

/// Outcome of a staleness scan, both lists in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaleScan {
    pub stale: Vec<BoardRecord>,
    /// Records without a lead email. They can never be refreshed.
    pub missing_lead: Vec<BoardRecord>,
}

pub fn default_max_age() -> Duration {
    Duration::days(DEFAULT_MAX_AGE_DAYS)
}

/// When the record was last synchronized. `None` if the date column is
/// empty or unreadable.
pub fn last_synced_at(record: &BoardRecord) -> Option<DateTime<Utc>> {
    record.last_synced.as_deref().and_then(parse_timestamp)
}

/// A record is stale when it was last synchronized strictly before
/// `now - max_age`. Records without a readable date are always stale.
pub fn is_stale(record: &BoardRecord, now: DateTime<Utc>, max_age: Duration) -> bool {
    let cutoff = now
        .checked_sub_signed(max_age)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    match last_synced_at(record) {
        Some(synced_at) => synced_at < cutoff,
        None => true,
    }
}

pub fn list_stale(records: &[BoardRecord], now: DateTime<Utc>, max_age: Duration) -> StaleScan {
    let mut scan = StaleScan::default();
    for record in records {
        if record.lead_email().is_none() {
            scan.missing_lead.push(record.clone());
        } else if is_stale(record, now, max_age) {
            scan.stale.push(record.clone());
        }
    }
    scan
}
