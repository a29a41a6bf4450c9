use axum::Json;

use crate::dashboards::d400_monthly_summary::service;
use contracts::dashboards::d400_monthly_summary::dto::MonthlySummaryResponse;

/// GET /api/d400/monthly_summary
pub async fn get_monthly_summary() -> Result<Json<MonthlySummaryResponse>, axum::http::StatusCode> {
    match service::monthly_summary().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("Monthly summary failed: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
