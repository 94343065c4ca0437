use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::models::webhook::{WebhookRequest, WebhookResponse};
use crate::models::{ContextSet, Intent};
use crate::services::dialogue::{self, Turn};
use crate::services::phone;
use crate::state::AppState;

/// Shown when a turn blows up anywhere past the router. The channel gets
/// this text and a 500, never a raw error.
pub const SERVER_ERROR_TEXT: &str = "Something went wrong on the server. Please try again later.";

pub async fn dialogue_webhook(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WebhookRequest>,
) -> Response {
    match process_turn(&state, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "dialogue turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookResponse::fallback(SERVER_ERROR_TEXT)),
            )
                .into_response()
        }
    }
}

async fn process_turn(
    state: &Arc<AppState>,
    request: WebhookRequest,
) -> anyhow::Result<WebhookResponse> {
    let query = request.query_result.ok_or_else(|| anyhow!("missing queryResult"))?;

    let intent_name = query
        .intent
        .as_ref()
        .map(|intent| intent.display_name.as_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow!("missing intent display name"))?;

    let caller_phone = request
        .original_detect_intent_request
        .as_ref()
        .and_then(|channel| caller_phone(&channel.payload))
        .map(|raw| phone::normalize(&raw, &state.config.country_code));

    tracing::info!(
        intent = intent_name,
        phone = caller_phone.as_deref().unwrap_or("-"),
        query = %query.query_text,
        "dialogue turn"
    );

    let turn = Turn {
        intent: Intent::from_display_name(intent_name),
        caller_phone,
        parameters: query.parameters,
        contexts: ContextSet::new(query.output_contexts),
    };

    let reply = dialogue::handle_turn(state, turn).await?;

    let session = request.session.as_deref().unwrap_or("");
    Ok(WebhookResponse {
        fulfillment_text: reply.text,
        output_contexts: reply
            .contexts
            .into_iter()
            .map(|ctx| ctx.qualify(session))
            .collect(),
        payload: reply.payload,
    })
}

/// Digs the caller's number out of the channel-specific envelope. WhatsApp
/// integrations disagree on where it lives, so a few known spots are tried;
/// a channel that supplies none simply gets no notifications.
fn caller_phone(payload: &Value) -> Option<String> {
    let raw = payload
        .get("from")
        .and_then(Value::as_str)
        .or_else(|| payload.pointer("/data/from").and_then(Value::as_str))
        .or_else(|| payload.pointer("/sender/phone").and_then(Value::as_str))?;

    let raw = raw.strip_prefix("whatsapp:").unwrap_or(raw).trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_phone_known_shapes() {
        let payload = serde_json::json!({"from": "whatsapp:+919876543210"});
        assert_eq!(caller_phone(&payload), Some("+919876543210".to_string()));

        let payload = serde_json::json!({"data": {"from": "919876543210"}});
        assert_eq!(caller_phone(&payload), Some("919876543210".to_string()));

        let payload = serde_json::json!({"sender": {"phone": "+91 98765 43210"}});
        assert_eq!(caller_phone(&payload), Some("+91 98765 43210".to_string()));
    }

    #[test]
    fn test_caller_phone_absent() {
        assert_eq!(caller_phone(&serde_json::json!({})), None);
        assert_eq!(caller_phone(&serde_json::json!({"from": ""})), None);
        assert_eq!(caller_phone(&Value::Null), None);
    }
}
