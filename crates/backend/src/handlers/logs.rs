use axum::extract::Query;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::shared::logger::repository;
use contracts::shared::logger::{CreateLogEntry, LogEntry};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

/// GET /api/logs
pub async fn list_all(
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LogEntry>>, axum::http::StatusCode> {
    match repository::list_recent(query.limit.unwrap_or(500)).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/logs
pub async fn create(
    Json(entry): Json<CreateLogEntry>,
) -> Result<(), axum::http::StatusCode> {
    match repository::insert(entry).await {
        Ok(_) => Ok(()),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/logs
pub async fn clear_all() -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    match repository::clear_all().await {
        Ok(deleted) => Ok(Json(json!({"deleted": deleted}))),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
