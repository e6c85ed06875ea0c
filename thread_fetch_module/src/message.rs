use serde_json::Value;

/// Bucket shared by every message that carries no thread id.
pub const NO_THREAD_ID: &str = "_no_thread_";

/// Keys the email list may live under, checked in order.
pub const MESSAGE_LIST_KEYS: [&str; 3] = ["items", "data", "emails"];

/// One email sent to or received from a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub thread_id: Option<String>,
    pub timestamp: Option<String>,
    pub sender: String,
    pub subject: String,
    pub body: String,
}

impl Message {
    /// Build a message from one entry of the email list.
    ///
    /// Returns `None` for entries that are not JSON objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        let thread_id = non_empty_str(value, "thread_id").map(str::to_string);
        let timestamp = non_empty_str(value, "timestamp_email")
            .or_else(|| non_empty_str(value, "timestamp_created"))
            .map(str::to_string);
        let sender = ["from", "sender", "from_address_email"]
            .iter()
            .find_map(|key| non_empty_str(value, key))
            .unwrap_or_default()
            .to_string();
        let subject = value
            .get("subject")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let structured_body = value.get("body");
        let body = structured_body
            .and_then(|body| non_empty_str(body, "text"))
            .or_else(|| non_empty_str(value, "plain_body"))
            .or_else(|| structured_body.and_then(|body| non_empty_str(body, "html")))
            .unwrap_or_default()
            .trim()
            .to_string();

        Some(Self {
            thread_id,
            timestamp,
            sender,
            subject,
            body,
        })
    }

    pub fn thread_key(&self) -> &str {
        self.thread_id.as_deref().unwrap_or(NO_THREAD_ID)
    }

    /// Sort key within a thread; a missing timestamp sorts first.
    pub fn timestamp_key(&self) -> &str {
        self.timestamp.as_deref().unwrap_or("")
    }
}

/// Locate the email list in an Instantly response.
///
/// The list may sit under any of [`MESSAGE_LIST_KEYS`] or be the payload
/// itself. The first array found wins; anything else yields an empty list.
pub fn extract_message_list(payload: &Value) -> &[Value] {
    for key in MESSAGE_LIST_KEYS {
        if let Some(list) = payload.get(key).and_then(Value::as_array) {
            return list;
        }
    }
    payload.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}
