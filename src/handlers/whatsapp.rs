use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::services::notify::{Delivery, MediaAttachment};
use crate::services::phone;
use crate::state::AppState;

/// Direct send surface for other backend pieces (campaign blasts, manual
/// nudges). Same gateway and policy as the dialogue notifications, but
/// here the caller does want to know whether delivery worked.
#[derive(Deserialize)]
pub struct SendRequest {
    pub campaign_name: String,
    pub destination: String,
    #[serde(default)]
    pub template_params: Vec<String>,
    #[serde(default)]
    pub media: Option<MediaAttachment>,
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendRequest>,
) -> Response {
    let destination = phone::normalize(&request.destination, &state.config.country_code);

    let delivery = state
        .notifier
        .send(
            Some(&destination),
            &request.campaign_name,
            request.template_params,
            request.media,
        )
        .await;

    match delivery {
        Delivery::Sent => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "WhatsApp message sent successfully."
            })),
        )
            .into_response(),
        Delivery::Skipped | Delivery::Failed => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "success": false,
                "message": "Failed to send WhatsApp message."
            })),
        )
            .into_response(),
    }
}
