use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{info, warn};

use relay_push::PushError;
use relay_types::api::{NotifyOrderQuery, NotifyOrderRequest, NotifyOrderResponse, RecipientResult};
use relay_types::models::{DispatchMode, OrderNotification};

use crate::format::format_order;
use crate::state::{AppState, AppStateInner};

/// Upper bound on in-flight pushes during a broadcast.
pub const BROADCAST_CONCURRENCY: usize = 8;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid order request: {0}")]
    InvalidRequest(String),

    #[error("no recipient: send user_id or configure LINE_USER_ID")]
    MissingRecipient,

    #[error("no registered recipients to broadcast to")]
    NoRecipients,

    #[error("push to {user_id} failed: {source}")]
    Push {
        user_id: String,
        #[source]
        source: PushError,
    },
}

impl NotifyError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::MissingRecipient => StatusCode::BAD_REQUEST,
            Self::NoRecipients => StatusCode::CONFLICT,
            Self::Push { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for NotifyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let user_id = match &self {
            Self::Push { user_id, .. } => Some(user_id.clone()),
            _ => None,
        };

        let body = NotifyOrderResponse {
            success: false,
            user_id,
            status_code: status.as_u16(),
            response: self.to_string(),
            results: None,
        };

        (status, Json(body)).into_response()
    }
}

/// POST /notify-order: format the order and push it to the recipient(s)
/// picked by the configured dispatch mode.
///
/// Accepts a JSON body, or the legacy `?order_id=` query with an empty body.
pub async fn notify_order(
    State(state): State<AppState>,
    query: Result<Query<NotifyOrderQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<NotifyOrderResponse>, NotifyError> {
    let parsed = query
        .map_err(|rejection| NotifyError::InvalidRequest(rejection.body_text()))
        .and_then(|Query(query)| parse_request(query, &body));
    let (recipient, order) = parsed.map_err(|e| {
        warn!("Rejected order notification: {}", e);
        e
    })?;

    let response = dispatch(&state, recipient, &order).await?;
    Ok(Json(response))
}

fn parse_request(
    query: NotifyOrderQuery,
    body: &[u8],
) -> Result<(Option<String>, OrderNotification), NotifyError> {
    let (recipient, order) = if body.iter().all(u8::is_ascii_whitespace) {
        let order_id = query.order_id.ok_or_else(|| {
            NotifyError::InvalidRequest("expected a JSON body or an order_id query parameter".into())
        })?;
        (query.user_id, OrderNotification::Reference { order_id })
    } else {
        NotifyOrderRequest::from_slice(body)
            .map_err(|e| NotifyError::InvalidRequest(e.to_string()))?
            .into_parts()
    };

    if let OrderNotification::Reference { order_id } = &order
        && order_id.trim().is_empty()
    {
        return Err(NotifyError::InvalidRequest("order_id is empty".into()));
    }

    let recipient = recipient.filter(|id| !id.trim().is_empty());
    Ok((recipient, order))
}

/// Resolve recipients for the configured mode and push the rendered order.
pub async fn dispatch(
    state: &AppStateInner,
    recipient: Option<String>,
    order: &OrderNotification,
) -> Result<NotifyOrderResponse, NotifyError> {
    let text = format_order(order);

    match state.mode {
        DispatchMode::Single => {
            let to = recipient.ok_or(NotifyError::MissingRecipient)?;
            push_one(state, to, &text).await
        }
        DispatchMode::Fixed => {
            let to = state.fixed_recipient.clone().ok_or(NotifyError::MissingRecipient)?;
            push_one(state, to, &text).await
        }
        DispatchMode::Broadcast => broadcast(state, &text).await,
    }
}

async fn push_one(
    state: &AppStateInner,
    user_id: String,
    text: &str,
) -> Result<NotifyOrderResponse, NotifyError> {
    let outcome = match state.line.send(&user_id, text).await {
        Ok(outcome) => outcome,
        Err(source) => return Err(NotifyError::Push { user_id, source }),
    };

    info!(
        "Order notification to {}: status {}",
        user_id, outcome.status_code
    );

    Ok(NotifyOrderResponse {
        success: outcome.is_success(),
        user_id: Some(user_id),
        status_code: outcome.status_code,
        response: outcome.body,
        results: None,
    })
}

async fn broadcast(state: &AppStateInner, text: &str) -> Result<NotifyOrderResponse, NotifyError> {
    let recipients = state.recipients.all();
    if recipients.is_empty() {
        warn!("Broadcast requested but no LINE users have interacted yet");
        return Err(NotifyError::NoRecipients);
    }

    // `buffered` keeps results in registry order
    let results: Vec<RecipientResult> = stream::iter(recipients)
        .map(|user_id| async move {
            match state.line.send(&user_id, text).await {
                Ok(outcome) => RecipientResult {
                    success: outcome.is_success(),
                    status_code: outcome.status_code,
                    response: outcome.body,
                    user_id,
                },
                Err(e) => RecipientResult {
                    success: false,
                    status_code: StatusCode::BAD_GATEWAY.as_u16(),
                    response: e.to_string(),
                    user_id,
                },
            }
        })
        .buffered(BROADCAST_CONCURRENCY)
        .collect()
        .await;

    let total = results.len();
    let delivered = results.iter().filter(|r| r.success).count();
    let status_code = results
        .iter()
        .find(|r| !r.success)
        .map_or(200, |r| r.status_code);

    info!("Broadcast order notification: {}/{} delivered", delivered, total);

    Ok(NotifyOrderResponse {
        success: delivered == total,
        user_id: None,
        status_code,
        response: format!("{}/{} delivered", delivered, total),
        results: Some(results),
    })
}
