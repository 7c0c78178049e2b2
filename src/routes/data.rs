use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{InsightReport, SalesPayload};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/data", get(get_dashboard_data))
        .route("/insights", get(get_insights))
}

async fn get_dashboard_data(
    State(state): State<AppState>,
) -> Result<Json<SalesPayload>, AppError> {
    info!("GET /api/data - Deriving dashboard payload");
    let payload = load_payload(&state)?;
    Ok(Json(payload))
}

async fn get_insights(State(state): State<AppState>) -> Result<Json<InsightReport>, AppError> {
    info!("GET /api/insights - Ranking insights");
    let payload = load_payload(&state)?;
    Ok(Json(services::insights::rank(&payload.as_raw())))
}

// Re-derived on every call; a fresh load fully replaces prior state.
fn load_payload(state: &AppState) -> Result<SalesPayload, AppError> {
    services::ingest::load_dashboard_data(&state.sales_data_file).map_err(|e| {
        error!("Failed to derive dashboard payload: {:#}", e);
        AppError::Internal(format!("{e:#}"))
    })
}
