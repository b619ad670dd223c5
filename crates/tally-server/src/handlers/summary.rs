//! Fast summary from the key-value mirror

use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use tally_core::{SaleItem, SalaryItem};

/// Items returned per mirror table
pub const SUMMARY_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    recent_sales: Vec<SaleItem>,
    recent_salaries: Vec<SalaryItem>,
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    tracing::info!("Reading summary from the key-value store");

    let (recent_sales, recent_salaries) = tokio::try_join!(
        state.mirror.recent_sales(SUMMARY_LIMIT),
        state.mirror.recent_salaries(SUMMARY_LIMIT),
    )
    .map_err(|e| {
        tracing::error!("Failed to read from the key-value store: {}", e);
        ApiError::internal("Failed to fetch summary data.")
    })?;

    Ok(Json(SummaryResponse {
        recent_sales,
        recent_salaries,
    }))
}
