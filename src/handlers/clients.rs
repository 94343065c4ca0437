use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Client;
use crate::services::phone;
use crate::state::AppState;

/// Looks a client up by the same normalized phone key the intake flow
/// upserts on, so any accepted formatting of the number resolves.
pub async fn get_client_by_phone(
    State(state): State<Arc<AppState>>,
    Path(raw_phone): Path<String>,
) -> Result<Json<Client>, AppError> {
    let normalized = phone::normalize(&raw_phone, &state.config.country_code);

    let client = {
        let db = state.db.lock().unwrap();
        queries::get_client_by_phone(&db, &normalized)
            .map_err(|e| AppError::Internal(e.to_string()))?
    };

    client
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("client with phone {normalized}")))
}
