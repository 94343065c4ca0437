use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{NewProfessional, Professional};
use crate::services::notify::campaigns;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

pub async fn list_professionals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Professional>>, AppError> {
    let limit = query.limit.unwrap_or(100);
    let professionals = {
        let db = state.db.lock().unwrap();
        queries::list_professionals(&db, limit).map_err(internal)?
    };
    Ok(Json(professionals))
}

pub async fn get_professional(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Professional>, AppError> {
    let professional = {
        let db = state.db.lock().unwrap();
        queries::get_professional(&db, id).map_err(internal)?
    };

    professional
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("professional {id}")))
}

pub async fn create_professional(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewProfessional>,
) -> Result<(StatusCode, Json<Professional>), AppError> {
    if new.full_name.trim().is_empty() || new.email.trim().is_empty() || new.phone.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "full_name, email and phone are required".to_string(),
        ));
    }

    let professional = {
        let db = state.db.lock().unwrap();
        queries::create_professional(&db, &new).map_err(internal)?
    };

    state
        .notifier
        .send(
            professional.phone.as_deref(),
            campaigns::PROFESSIONAL_ONBOARDING,
            vec![professional.full_name.clone()],
            None,
        )
        .await
        .best_effort();

    Ok((StatusCode::CREATED, Json(professional)))
}

fn internal(e: anyhow::Error) -> AppError {
    AppError::Internal(e.to_string())
}
