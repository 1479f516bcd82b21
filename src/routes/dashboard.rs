//! Dashboard route: the cached inventory summary for the overview page.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::services::dashboard::DashboardSummary;
use crate::AppState;

/// GET /api/v1/dashboard — aggregated summary, served from the cache when fresh.
pub async fn summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    let summary = state.dashboard.get_summary().await?;
    Ok(ApiResponse::success(summary))
}
