use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::notify::campaigns;
use crate::services::phone;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OtpSendRequest {
    pub phone: String,
}

/// Issues a code for the number and delivers it over WhatsApp. The code
/// itself never appears in the HTTP response.
pub async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OtpSendRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.phone.trim().is_empty() {
        return Err(AppError::BadRequest("phone is required".to_string()));
    }

    let destination = phone::normalize(&request.phone, &state.config.country_code);
    let code = state.otp.issue(&destination);

    state
        .notifier
        .send(Some(&destination), campaigns::LOGIN_OTP, vec![code], None)
        .await
        .best_effort();

    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct OtpVerifyRequest {
    pub phone: String,
    pub code: String,
}

pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OtpVerifyRequest>,
) -> Json<serde_json::Value> {
    let destination = phone::normalize(&request.phone, &state.config.country_code);
    let valid = state.otp.verify(&destination, request.code.trim());

    Json(serde_json::json!({ "valid": valid }))
}
