use serde_json::Value;

use crate::item::{BoardItem, ColumnValue};

/// Column type of the lead column, which decides how a new lead is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeadColumnKind {
    #[default]
    Email,
    Text,
}

/// Column ids the sync reads and writes.
///
/// The three required columns are the lead email, the last-contact date and
/// the stored thread text. The rest are only written when an inbound event
/// creates a new item, and are skipped when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardColumns {
    pub lead_email: String,
    pub lead_kind: LeadColumnKind,
    pub last_contact: String,
    pub thread: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub linkedin: Option<String>,
    pub sender_account: Option<String>,
    pub event_type: Option<String>,
    pub campaign: Option<String>,
}

impl BoardColumns {
    /// Columns fetched when reading records.
    pub fn read_ids(&self) -> Vec<String> {
        vec![
            self.lead_email.clone(),
            self.last_contact.clone(),
            self.thread.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub board_id: String,
    pub group_id: String,
    pub columns: BoardColumns,
}

/// The lead column is either an email column (structured value carrying an
/// `email` field) or a plain text column. Resolved once when the item is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadColumn {
    Email(String),
    Text(String),
    Missing,
}

impl LeadColumn {
    pub fn from_column(column: Option<&ColumnValue>) -> Self {
        let Some(column) = column else {
            return LeadColumn::Missing;
        };

        let structured = column
            .value
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .and_then(|value| {
                value
                    .get("email")
                    .and_then(Value::as_str)
                    .map(|email| email.trim().to_string())
            })
            .filter(|email| !email.is_empty());
        if let Some(email) = structured {
            return LeadColumn::Email(email);
        }

        match column.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => LeadColumn::Text(text.to_string()),
            _ => LeadColumn::Missing,
        }
    }

    pub fn lead_email(&self) -> Option<&str> {
        match self {
            LeadColumn::Email(email) | LeadColumn::Text(email) => Some(email),
            LeadColumn::Missing => None,
        }
    }

    pub fn matches(&self, email: &str) -> bool {
        self.lead_email()
            .map(|lead| lead.eq_ignore_ascii_case(email.trim()))
            .unwrap_or(false)
    }
}

/// A board item reduced to what the sync cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRecord {
    pub item_id: String,
    pub name: String,
    pub lead: LeadColumn,
    pub thread_text: String,
    /// Text rendering of the last-contact date column, unparsed.
    pub last_synced: Option<String>,
}

impl BoardRecord {
    pub fn from_item(item: &BoardItem, columns: &BoardColumns) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            lead: LeadColumn::from_column(item.column(&columns.lead_email)),
            thread_text: item
                .column_text(&columns.thread)
                .unwrap_or_default()
                .to_string(),
            last_synced: item
                .column_text(&columns.last_contact)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
        }
    }

    pub fn lead_email(&self) -> Option<&str> {
        self.lead.lead_email()
    }
}
