use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One board item as returned by the items queries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoardItem {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

/// A column cell. `value` is the raw JSON-encoded value, `text` its
/// human-readable rendering; either may be null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnValue {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl BoardItem {
    pub fn column(&self, column_id: &str) -> Option<&ColumnValue> {
        self.column_values
            .iter()
            .find(|column| column.id == column_id)
    }

    pub fn column_text(&self, column_id: &str) -> Option<&str> {
        self.column(column_id).and_then(|column| column.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsPage {
    #[serde(default)]
    pub(crate) cursor: Option<String>,
    #[serde(default)]
    pub(crate) items: Vec<BoardItem>,
}

/// Monday ids are strings in the current API but numbers in older ones.
pub(crate) fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| serde::de::Error::custom("item id must be a string or number"))
}
