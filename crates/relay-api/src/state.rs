use std::sync::Arc;

use relay_push::LineClient;
use relay_types::models::DispatchMode;

use crate::registry::RecipientStore;

pub type AppState = Arc<AppStateInner>;

/// Everything the handlers share. Built once at startup.
pub struct AppStateInner {
    pub recipients: Arc<dyn RecipientStore>,
    pub line: LineClient,
    pub mode: DispatchMode,
    /// Recipient used in `DispatchMode::Fixed`.
    pub fixed_recipient: Option<String>,
    /// Text pushed back to users who message the bot; `None` disables it.
    pub ack_text: Option<String>,
}
