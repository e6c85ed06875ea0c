use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::message::{extract_message_list, Message};
use crate::render::LeadThread;
use crate::ThreadSource;

pub const DEFAULT_INSTANTLY_API_BASE_URL: &str = "https://api.instantly.ai/api/v2";
/// Page size requested from the email listing endpoint.
pub const MESSAGE_PAGE_LIMIT: u32 = 100;

/// Blocking client for the Instantly email listing endpoint.
#[derive(Clone)]
pub struct InstantlyClient {
    api_key: String,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl fmt::Debug for InstantlyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstantlyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl InstantlyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_INSTANTLY_API_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key: api_key.into(),
            base_url,
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List every email exchanged with a lead, oldest first as returned by the API.
    pub fn list_emails(&self, lead_email: &str) -> Result<Vec<Message>, FetchError> {
        let lead_email = lead_email.trim();
        if lead_email.is_empty() {
            return Err(FetchError::EmptyLead);
        }

        let url = format!("{}/emails", self.base_url);
        let limit = MESSAGE_PAGE_LIMIT.to_string();
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .query(&[
                ("lead", lead_email),
                ("limit", limit.as_str()),
                ("sort_order", "asc"),
            ])
            .send()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        debug!("instantly emails status={} lead={}", status, lead_email);
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        let payload: Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let messages: Vec<Message> = extract_message_list(&payload)
            .iter()
            .filter_map(Message::from_value)
            .collect();
        debug!("instantly returned {} emails for {}", messages.len(), lead_email);
        Ok(messages)
    }

    /// Fetch and render the full conversation with a lead.
    pub fn fetch_thread(&self, lead_email: &str) -> Result<LeadThread, FetchError> {
        let messages = self.list_emails(lead_email)?;
        if messages.is_empty() {
            info!("no emails found for {}", lead_email.trim());
        }
        Ok(LeadThread::from_messages(messages))
    }
}

impl ThreadSource for InstantlyClient {
    fn fetch_thread(&self, lead_email: &str) -> Result<LeadThread, FetchError> {
        InstantlyClient::fetch_thread(self, lead_email)
    }
}
