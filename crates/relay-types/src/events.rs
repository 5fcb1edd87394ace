use serde::Deserialize;

/// Envelope LINE posts to the webhook URL.
///
/// Events are kept as raw JSON so each one can be decoded on its own; a
/// single malformed event must not take the rest of the batch with it.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    /// Bot user id the events were sent to.
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

/// Webhook events the relay acts on. Everything else collapses into `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebhookEvent {
    /// A user added the bot as a friend (or unblocked it)
    Follow { source: EventSource },

    /// A user sent the bot a message
    Message {
        source: EventSource,
        message: EventMessage,
    },

    /// unfollow, postback, join, ...
    #[serde(other)]
    Other,
}

impl WebhookEvent {
    pub fn decode(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// The LINE user id that triggered the event, if the event carries one.
    pub fn sender(&self) -> Option<&str> {
        match self {
            Self::Follow { source } | Self::Message { source, .. } => Some(source.user_id.as_str()),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    /// `user`, `group` or `room`
    #[serde(rename = "type", default)]
    pub kind: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Only present on text messages.
    #[serde(default)]
    pub text: Option<String>,
}
