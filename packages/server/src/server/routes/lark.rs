//! Lark event and card callback endpoint.

use axum::{
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lark_client::events::{EventParseError, EventPayload};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domains::banners::{decide, error_toast, request_approvals};
use crate::server::app::AppState;

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn ack() -> Response {
    (StatusCode::OK, Json(json!({}))).into_response()
}

/// Handle a callback from Lark.
///
/// - `url_verification` is answered with its challenge
/// - record changes start approval requests
/// - card clicks are answered with a toast, including on failure, so the
///   operator sees what went wrong
pub async fn lark_webhook_handler(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Response {
    let payload = match EventPayload::parse(&body) {
        Ok(payload) => payload,
        Err(EventParseError::Encrypted) => {
            warn!("Received encrypted Lark payload; disable the encrypt key for this app");
            return reject(StatusCode::BAD_REQUEST, "encrypted payloads are not supported");
        }
        Err(e) => {
            warn!(error = %e, "Malformed Lark payload");
            return reject(StatusCode::BAD_REQUEST, "malformed payload");
        }
    };

    if payload.verification_token() != &*state.verification_token {
        warn!(event_type = %payload.event_type(), "Lark payload with wrong verification token");
        return reject(StatusCode::UNAUTHORIZED, "invalid verification token");
    }

    match payload {
        EventPayload::UrlVerification(verification) => {
            info!("Answering Lark url verification");
            Json(json!({ "challenge": verification.challenge })).into_response()
        }

        EventPayload::BitableRecordChanged { header, event } => {
            debug!(event_id = %header.event_id, ?event, "Received bitable record changed event");
            match request_approvals(&event, &state.deps).await {
                Ok(events) => {
                    info!(
                        event_id = %header.event_id,
                        count = events.len(),
                        "Bitable change handled"
                    );
                    ack()
                }
                Err(e) => {
                    let error = format!("{:#}", e);
                    error!(
                        event_id = %header.event_id,
                        %error,
                        "Failed to request banner approvals"
                    );
                    reject(StatusCode::INTERNAL_SERVER_ERROR, "failed to handle event")
                }
            }
        }

        EventPayload::CardActionTrigger { header, event } => {
            debug!(event_id = %header.event_id, ?event, "Received card action trigger event");
            match decide(&event, &state.deps).await {
                Ok(outcome) => {
                    debug!(
                        event_id = %header.event_id,
                        events = ?outcome.events,
                        "Card action handled"
                    );
                    Json(outcome.response).into_response()
                }
                Err(e) => {
                    let error = format!("{:#}", e);
                    error!(event_id = %header.event_id, %error, "Failed to handle card action");
                    Json(error_toast(e.to_string())).into_response()
                }
            }
        }

        EventPayload::MessageReceive { header, event } => {
            debug!(
                event_id = %header.event_id,
                chat_id = %event.message.chat_id,
                "Received message, nothing to do"
            );
            ack()
        }

        EventPayload::Other { header } => {
            debug!(event_type = %header.event_type, "Ignoring unsupported Lark event");
            ack()
        }
    }
}
