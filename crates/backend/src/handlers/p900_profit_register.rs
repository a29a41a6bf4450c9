use axum::extract::Query;
use axum::Json;

use crate::projections::p900_profit_register::service;
use contracts::projections::p900_profit_register::dto::{
    ProfitRegisterQuery, ProfitRegisterRow, ProfitStatsRow,
};

/// GET /api/p900/profit-register
pub async fn list(
    Query(query): Query<ProfitRegisterQuery>,
) -> Result<Json<Vec<ProfitRegisterRow>>, axum::http::StatusCode> {
    match service::list(&query).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/p900/stats/by-date
pub async fn stats_by_date(
    Query(query): Query<ProfitRegisterQuery>,
) -> Result<Json<Vec<ProfitStatsRow>>, axum::http::StatusCode> {
    match service::stats_by_date(&query).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/p900/stats/by-marketplace
pub async fn stats_by_marketplace(
    Query(query): Query<ProfitRegisterQuery>,
) -> Result<Json<Vec<ProfitStatsRow>>, axum::http::StatusCode> {
    match service::stats_by_marketplace(&query).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
