use axum::{Json, body::Bytes, extract::State};
use tracing::{debug, info, warn};

use relay_types::api::{StatusResponse, UsersResponse};
use relay_types::events::{WebhookEvent, WebhookPayload};

use crate::state::{AppState, AppStateInner};

/// Per-batch tally, logged once the batch is done.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub followed: usize,
    pub messaged: usize,
    pub ignored: usize,
    pub malformed: usize,
    pub acked: usize,
}

/// Process one webhook delivery. Events are handled in order and each one in
/// isolation: a malformed event is logged and skipped, never fatal.
pub async fn ingest(state: &AppStateInner, body: &[u8]) -> IngestReport {
    let mut report = IngestReport::default();

    let payload: WebhookPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Unparseable webhook body ({} bytes): {}", body.len(), e);
            return report;
        }
    };

    for (index, raw) in payload.events.into_iter().enumerate() {
        let event = match WebhookEvent::decode(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping malformed webhook event #{}: {}", index, e);
                report.malformed += 1;
                continue;
            }
        };

        if event.sender().is_some_and(|id| id.trim().is_empty()) {
            warn!("Skipping webhook event #{} with blank userId", index);
            report.malformed += 1;
            continue;
        }

        match event {
            WebhookEvent::Follow { source } => {
                let is_new = state.recipients.add(&source.user_id);
                info!("New follower: {} (first seen: {})", source.user_id, is_new);
                report.followed += 1;
            }
            WebhookEvent::Message { source, message } => {
                state.recipients.add(&source.user_id);
                info!(
                    "Message from {} [{}]: {}",
                    source.user_id,
                    message.kind,
                    message.text.as_deref().unwrap_or("<no text>")
                );
                report.messaged += 1;

                if let Some(ack) = &state.ack_text
                    && acknowledge(state, &source.user_id, ack).await
                {
                    report.acked += 1;
                }
            }
            WebhookEvent::Other => {
                debug!("Ignoring webhook event #{}", index);
                report.ignored += 1;
            }
        }
    }

    info!(
        followed = report.followed,
        messaged = report.messaged,
        ignored = report.ignored,
        malformed = report.malformed,
        acked = report.acked,
        "Webhook batch processed"
    );

    report
}

async fn acknowledge(state: &AppStateInner, user_id: &str, text: &str) -> bool {
    match state.line.send(user_id, text).await {
        Ok(outcome) if outcome.is_success() => true,
        Ok(outcome) => {
            warn!("Ack to {} rejected with status {}", user_id, outcome.status_code);
            false
        }
        Err(e) => {
            warn!("Ack to {} not sent: {}", user_id, e);
            false
        }
    }
}

/// POST /line/webhook: always answers 200 so LINE never redelivers.
pub async fn line_webhook(State(state): State<AppState>, body: Bytes) -> Json<StatusResponse> {
    ingest(&state, &body).await;
    Json(StatusResponse::ok())
}

/// GET /line/users
pub async fn list_users(State(state): State<AppState>) -> Json<UsersResponse> {
    // Count comes from the same snapshot so the two never disagree
    let users = state.recipients.all();
    Json(UsersResponse {
        count: users.len(),
        users,
    })
}
