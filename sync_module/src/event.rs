use serde_json::Value;

pub const EMAIL_SENT: &str = "email_sent";
pub const CAMPAIGN_COMPLETED: &str = "campaign_completed";

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid event: {0}")]
    Invalid(String),
}

/// A notification pushed by the outreach platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    EmailSent(EmailSentEvent),
    CampaignCompleted(CampaignCompletedEvent),
    Other { event_type: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSentEvent {
    pub lead_email: String,
    pub email_account: Option<String>,
    pub timestamp: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub linkedin: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignCompletedEvent {
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub timestamp: Option<String>,
}

impl Event {
    pub fn from_json(body: &[u8]) -> Result<Self, EventError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, EventError> {
        if !value.is_object() {
            return Err(EventError::Invalid("expected a JSON object".to_string()));
        }
        let event_type = string_field(value, &["event_type"])
            .ok_or_else(|| EventError::Invalid("missing event_type".to_string()))?;

        match normalize_event_type(&event_type).as_str() {
            EMAIL_SENT => EmailSentEvent::from_value(value).map(Event::EmailSent),
            CAMPAIGN_COMPLETED => Ok(Event::CampaignCompleted(
                CampaignCompletedEvent::from_value(value),
            )),
            _ => Ok(Event::Other { event_type }),
        }
    }

    /// Canonical kind, as written to the board's event column.
    pub fn event_type(&self) -> &str {
        match self {
            Event::EmailSent(_) => EMAIL_SENT,
            Event::CampaignCompleted(_) => CAMPAIGN_COMPLETED,
            Event::Other { event_type } => event_type,
        }
    }
}

impl EmailSentEvent {
    fn from_value(value: &Value) -> Result<Self, EventError> {
        let lead_email = string_field(value, &["lead_email"])
            .ok_or_else(|| EventError::Invalid("email_sent without lead_email".to_string()))?;
        Ok(Self {
            lead_email,
            email_account: string_field(value, &["email_account"]),
            timestamp: string_field(value, &["timestamp"]),
            first_name: string_field(value, &["firstName", "first_name"]),
            last_name: string_field(value, &["lastName", "last_name"]),
            company_name: string_field(value, &["companyName", "company_name"]),
            job_title: string_field(value, &["jobTitle", "job_title", "title"]),
            linkedin: string_field(value, &["linkedIn", "linkedin", "linkedin_url"]),
            campaign_id: string_field(value, &["campaign_id"]),
            campaign_name: string_field(value, &["campaign_name"]),
        })
    }

    /// "First Last" when either part is known.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

impl CampaignCompletedEvent {
    fn from_value(value: &Value) -> Self {
        Self {
            campaign_id: string_field(value, &["campaign_id"]),
            campaign_name: string_field(value, &["campaign_name"]),
            timestamp: string_field(value, &["timestamp"]),
        }
    }

    pub fn item_name(&self) -> &str {
        self.campaign_name
            .as_deref()
            .or(self.campaign_id.as_deref())
            .unwrap_or("Campaign")
    }
}

fn normalize_event_type(event_type: &str) -> String {
    event_type.trim().to_ascii_lowercase().replace('.', "_")
}

/// First key holding a non-empty string (or a number, rendered as text).
fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key) {
        Some(Value::String(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}
