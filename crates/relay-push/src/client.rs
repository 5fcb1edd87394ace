use std::fmt;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::{PushError, Result};

pub const LINE_PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

/// Status and raw body returned by the push endpoint, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub status_code: u16,
    pub body: String,
}

impl PushOutcome {
    /// LINE answers an accepted push with exactly 200.
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Client for the LINE push endpoint. Cheap to clone.
#[derive(Clone)]
pub struct LineClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

impl fmt::Debug for LineClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl LineClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(access_token, LINE_PUSH_URL)
    }

    /// Point the client at a different push URL (staging, local stub).
    pub fn with_endpoint(access_token: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| PushError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Push one text message to one recipient.
    pub async fn send(&self, to: &str, text: &str) -> Result<PushOutcome> {
        let payload = PushRequest {
            to,
            messages: [TextMessage { kind: "text", text }],
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Push to {} failed: {}", to, e);
                PushError::Transport(e)
            })?;

        let status_code = resp.status().as_u16();
        let body = resp.text().await?;

        if status_code == 200 {
            debug!("Pushed message to {}", to);
        } else {
            warn!(status = status_code, body = %body, "LINE rejected push to {}", to);
        }

        Ok(PushOutcome { status_code, body })
    }
}
