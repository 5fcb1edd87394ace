use thiserror::Error;

use relay_push::LINE_PUSH_URL;
use relay_types::models::DispatchMode;

const DEFAULT_ACK_TEXT: &str = "รับข้อความแล้วครับ 🙏";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

/// Values shipped in `.env.example` that must never reach LINE.
const PLACEHOLDER_TOKENS: &[&str] = &[
    "your-channel-access-token",
    "change-me",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key}='{value}' is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration, read once at startup.
pub struct Config {
    pub access_token: String,
    pub fixed_recipient: Option<String>,
    pub mode: DispatchMode,
    pub push_url: String,
    /// `None` when acknowledgements are switched off.
    pub ack_text: Option<String>,
    pub cors_origins: Vec<String>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let access_token = get("LINE_CHANNEL_ACCESS_TOKEN")
            .ok_or(ConfigError::Missing("LINE_CHANNEL_ACCESS_TOKEN"))?;
        if PLACEHOLDER_TOKENS.contains(&access_token.as_str()) {
            return Err(ConfigError::Invalid {
                key: "LINE_CHANNEL_ACCESS_TOKEN",
                value: access_token,
                reason: "still the placeholder value".into(),
            });
        }

        let fixed_recipient = get("LINE_USER_ID");

        let mode = match get("NOTIFY_MODE") {
            Some(raw) => raw.parse::<DispatchMode>().map_err(|e| ConfigError::Invalid {
                key: "NOTIFY_MODE",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None if fixed_recipient.is_some() => DispatchMode::Fixed,
            None => DispatchMode::Single,
        };
        if mode == DispatchMode::Fixed && fixed_recipient.is_none() {
            return Err(ConfigError::Missing("LINE_USER_ID"));
        }

        let ack_enabled = match get("LINE_WEBHOOK_ACK") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "LINE_WEBHOOK_ACK",
                value: raw.clone(),
                reason: "expected true or false".into(),
            })?,
            None => true,
        };
        let ack_text = ack_enabled.then(|| get("LINE_ACK_TEXT").unwrap_or_else(|| DEFAULT_ACK_TEXT.into()));

        let cors_origins = get("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        let port = match get("RELAY_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "RELAY_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => 8000,
        };

        Ok(Self {
            access_token,
            fixed_recipient,
            mode,
            push_url: get("LINE_API_URL").unwrap_or_else(|| LINE_PUSH_URL.into()),
            ack_text,
            cors_origins,
            host: get("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
