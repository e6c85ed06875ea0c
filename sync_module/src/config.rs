use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use board_module::{BoardColumns, BoardLayout, LeadColumnKind, DEFAULT_MONDAY_API_URL};
use chrono::Duration;
use serde::Deserialize;
use thread_fetch_module::{InstantlyClient, DEFAULT_INSTANTLY_API_BASE_URL};

use crate::staleness::DEFAULT_MAX_AGE_DAYS;

pub const DEFAULT_MAX_AGE_HOURS: i64 = DEFAULT_MAX_AGE_DAYS * 24;
pub const DEFAULT_GROUP_ID: &str = "topics";
pub const DEFAULT_WEBHOOK_HOST: &str = "0.0.0.0";
pub const DEFAULT_WEBHOOK_PORT: u16 = 5001;
pub const DEFAULT_WEBHOOK_BODY_MAX_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration value: {key}")]
    Missing { key: &'static str },
    #[error("invalid value for {key}: {value} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("config file {path}: {reason}")]
    File { path: PathBuf, reason: String },
}

/// What an `email_sent` event does to the thread text of an existing item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThreadUpdatePolicy {
    /// Overwrite with the freshly fetched conversation.
    #[default]
    Replace,
    /// Keep the stored text and add the fetched conversation after it.
    /// The fetched conversation is the whole history, so it is only added
    /// when the stored text does not already end with it.
    Append,
}

impl FromStr for ThreadUpdatePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(ThreadUpdatePolicy::Replace),
            "append" => Ok(ThreadUpdatePolicy::Append),
            other => Err(format!("expected replace or append, got {}", other)),
        }
    }
}

#[derive(Clone)]
pub struct OutreachConfig {
    pub api_key: String,
    pub api_base_url: String,
}

#[derive(Clone)]
pub struct BoardConfig {
    pub api_token: String,
    pub api_url: String,
    pub layout: BoardLayout,
}

#[derive(Clone)]
pub struct WebhookConfig {
    pub host: String,
    pub port: u16,
    pub body_max_bytes: usize,
    /// Expected bearer token on inbound events; unset disables the check.
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub outreach: OutreachConfig,
    pub board: BoardConfig,
    pub max_age: Duration,
    pub update_policy: ThreadUpdatePolicy,
    pub webhook: WebhookConfig,
}

impl fmt::Debug for OutreachConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutreachConfig")
            .field("api_key", &"***")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl fmt::Debug for BoardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardConfig")
            .field("api_token", &"***")
            .field("api_url", &self.api_url)
            .field("layout", &self.layout)
            .finish()
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("body_max_bytes", &self.body_max_bytes)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Optional `sync.toml`. Secrets are never read from it.
#[derive(Debug, Deserialize, Default)]
pub struct SyncConfigFile {
    #[serde(default)]
    pub instantly: InstantlyFileConfig,
    #[serde(default)]
    pub monday: MondayFileConfig,
    #[serde(default)]
    pub sync: SyncFileConfig,
    #[serde(default)]
    pub server: ServerFileConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct InstantlyFileConfig {
    pub api_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MondayFileConfig {
    pub api_url: Option<String>,
    pub board_id: Option<String>,
    pub group_id: Option<String>,
    #[serde(default)]
    pub columns: ColumnsFileConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct ColumnsFileConfig {
    pub lead_email: Option<String>,
    pub lead_kind: Option<String>,
    pub last_contact: Option<String>,
    pub thread: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub linkedin: Option<String>,
    pub sender_account: Option<String>,
    pub event_type: Option<String>,
    pub campaign: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SyncFileConfig {
    pub max_age_hours: Option<i64>,
    pub update_policy: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_body_bytes: Option<usize>,
    pub verify_token: Option<bool>,
}

impl SyncConfig {
    /// Load from the process environment, layered over the optional config file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let file = match resolve_config_path() {
            Some(path) => load_config_file(&path)?,
            None => SyncConfigFile::default(),
        };
        Self::from_sources(&file, |key| env::var(key).ok())
    }

    /// Build from a parsed config file and an environment lookup; the
    /// environment wins wherever both supply a value.
    pub fn from_sources<F>(file: &SyncConfigFile, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let outreach = OutreachConfig::from_sources(file, &lookup)?;
        let board = BoardConfig::from_sources(file, &lookup)?;

        let max_age_hours = match value(&lookup, "SYNC_MAX_AGE_HOURS") {
            Some(raw) => parse_number::<i64>("SYNC_MAX_AGE_HOURS", &raw)?,
            None => file.sync.max_age_hours.unwrap_or(DEFAULT_MAX_AGE_HOURS),
        };
        if max_age_hours < 0 {
            return Err(ConfigError::Invalid {
                key: "SYNC_MAX_AGE_HOURS",
                value: max_age_hours.to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        let update_policy = match value(&lookup, "THREAD_UPDATE_POLICY")
            .or_else(|| file.sync.update_policy.clone())
        {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                key: "THREAD_UPDATE_POLICY",
                value: raw.clone(),
                reason,
            })?,
            None => ThreadUpdatePolicy::default(),
        };

        let host = value(&lookup, "WEBHOOK_HOST")
            .or_else(|| file.server.host.clone())
            .unwrap_or_else(|| DEFAULT_WEBHOOK_HOST.to_string());
        let port = match value(&lookup, "PORT") {
            Some(raw) => parse_number::<u16>("PORT", &raw)?,
            None => file.server.port.unwrap_or(DEFAULT_WEBHOOK_PORT),
        };
        let body_max_bytes = match value(&lookup, "WEBHOOK_MAX_BODY_BYTES") {
            Some(raw) => Some(parse_number::<usize>("WEBHOOK_MAX_BODY_BYTES", &raw)?),
            None => file.server.max_body_bytes,
        }
        .filter(|bytes| *bytes > 0)
        .unwrap_or(DEFAULT_WEBHOOK_BODY_MAX_BYTES);

        let verify_token = match value(&lookup, "WEBHOOK_VERIFY_TOKEN") {
            Some(raw) => parse_flag("WEBHOOK_VERIFY_TOKEN", &raw)?,
            None => file.server.verify_token.unwrap_or(true),
        };
        let token = if verify_token {
            value(&lookup, "INSTANTLY_WEBHOOK_TOKEN")
                .or_else(|| Some(outreach.api_key.clone()).filter(|key| !key.is_empty()))
        } else {
            None
        };

        Ok(Self {
            outreach,
            board,
            max_age: Duration::hours(max_age_hours),
            update_policy,
            webhook: WebhookConfig {
                host,
                port,
                body_max_bytes,
                token,
            },
        })
    }
}

impl OutreachConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let file = match resolve_config_path() {
            Some(path) => load_config_file(&path)?,
            None => SyncConfigFile::default(),
        };
        Self::from_sources(&file, &|key: &str| env::var(key).ok())
    }

    pub fn from_sources<F>(file: &SyncConfigFile, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(lookup, "INSTANTLY_API_KEY", None)?;
        let api_base_url = value(lookup, "INSTANTLY_API_BASE_URL")
            .or_else(|| file.instantly.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_INSTANTLY_API_BASE_URL.to_string());
        Ok(Self {
            api_key,
            api_base_url,
        })
    }

    pub fn client(&self) -> InstantlyClient {
        InstantlyClient::with_base_url(self.api_key.clone(), self.api_base_url.clone())
    }
}

impl BoardConfig {
    pub fn from_sources<F>(file: &SyncConfigFile, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let monday = &file.monday;
        let file_columns = &monday.columns;

        let api_token = required(lookup, "MONDAY_API_TOKEN", None)?;
        let api_url = value(lookup, "MONDAY_API_URL")
            .or_else(|| monday.api_url.clone())
            .unwrap_or_else(|| DEFAULT_MONDAY_API_URL.to_string());
        let board_id = required(lookup, "MONDAY_BOARD_ID", monday.board_id.as_deref())?;
        let group_id = value(lookup, "MONDAY_GROUP_ID")
            .or_else(|| monday.group_id.clone())
            .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string());

        let lead_kind = match value(lookup, "MONDAY_EMAIL_COL_KIND")
            .or_else(|| file_columns.lead_kind.clone())
        {
            Some(raw) => parse_lead_kind(&raw)?,
            None => LeadColumnKind::default(),
        };

        let optional = |key: &str, fallback: &Option<String>| {
            value(lookup, key).or_else(|| fallback.clone().filter(|id| !id.trim().is_empty()))
        };

        let columns = BoardColumns {
            lead_email: required(lookup, "MONDAY_EMAIL_COL", file_columns.lead_email.as_deref())?,
            lead_kind,
            last_contact: required(
                lookup,
                "MONDAY_LAST_CONTACT",
                file_columns.last_contact.as_deref(),
            )?,
            thread: required(lookup, "MONDAY_THREAD_COL", file_columns.thread.as_deref())?,
            first_name: optional("MONDAY_FIRST_NAME_COL", &file_columns.first_name),
            last_name: optional("MONDAY_LAST_NAME_COL", &file_columns.last_name),
            company: optional("MONDAY_COMPANY_COL", &file_columns.company),
            title: optional("MONDAY_TITLE_COL", &file_columns.title),
            linkedin: optional("MONDAY_LINKEDIN_COL", &file_columns.linkedin),
            sender_account: optional("MONDAY_SENDER_COL", &file_columns.sender_account),
            event_type: optional("MONDAY_EVENT_COL", &file_columns.event_type),
            campaign: optional("MONDAY_CAMPAIGN_COL", &file_columns.campaign),
        };

        Ok(Self {
            api_token,
            api_url,
            layout: BoardLayout {
                board_id,
                group_id,
                columns,
            },
        })
    }
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("SYNC_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let cwd = env::current_dir().ok()?;
    let direct = cwd.join("sync.toml");
    if direct.exists() {
        return Some(direct);
    }
    None
}

pub fn load_config_file(path: &Path) -> Result<SyncConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|err| ConfigError::File {
        path: path.to_path_buf(),
        reason: format!("failed to read: {}", err),
    })?;
    toml::from_str::<SyncConfigFile>(&content).map_err(|err| ConfigError::File {
        path: path.to_path_buf(),
        reason: format!("failed to parse: {}", err),
    })
}

fn value<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn required<F>(lookup: &F, key: &'static str, fallback: Option<&str>) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    value(lookup, key)
        .or_else(|| {
            fallback
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .map(str::to_string)
        })
        .ok_or(ConfigError::Missing { key })
}

fn parse_number<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_lead_kind(raw: &str) -> Result<LeadColumnKind, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "email" => Ok(LeadColumnKind::Email),
        "text" => Ok(LeadColumnKind::Text),
        _ => Err(ConfigError::Invalid {
            key: "MONDAY_EMAIL_COL_KIND",
            value: raw.to_string(),
            reason: "expected email or text".to_string(),
        }),
    }
}
