use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Map, Value};

/// Column values for `create_item` and `change_multiple_column_values`,
/// keyed by column id. Monday expects the whole map as a JSON-encoded string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    values: Map<String, Value>,
}

impl ColumnValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text column.
    pub fn text(&mut self, column_id: &str, text: &str) -> &mut Self {
        self.values
            .insert(column_id.to_string(), Value::String(text.to_string()));
        self
    }

    pub fn long_text(&mut self, column_id: &str, text: &str) -> &mut Self {
        self.values
            .insert(column_id.to_string(), json!({ "text": text }));
        self
    }

    pub fn email(&mut self, column_id: &str, email: &str) -> &mut Self {
        self.values
            .insert(column_id.to_string(), json!({ "email": email, "text": email }));
        self
    }

    pub fn link(&mut self, column_id: &str, url: &str, text: &str) -> &mut Self {
        self.values
            .insert(column_id.to_string(), json!({ "url": url, "text": text }));
        self
    }

    pub fn date(&mut self, column_id: &str, date: NaiveDate) -> &mut Self {
        self.values.insert(
            column_id.to_string(),
            json!({ "date": date.format("%Y-%m-%d").to_string() }),
        );
        self
    }

    /// Date column with a time part; Monday stores the time in UTC.
    pub fn date_time(&mut self, column_id: &str, at: DateTime<Utc>) -> &mut Self {
        self.values.insert(
            column_id.to_string(),
            json!({
                "date": at.format("%Y-%m-%d").to_string(),
                "time": at.format("%H:%M:%S").to_string(),
            }),
        );
        self
    }

    pub fn get(&self, column_id: &str) -> Option<&Value> {
        self.values.get(column_id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json_string(&self) -> String {
        Value::Object(self.values.clone()).to_string()
    }
}
