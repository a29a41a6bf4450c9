use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use crate::domain::a010_notification;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

/// GET /api/notification
pub async fn list_recent(
    Query(query): Query<ListQuery>,
) -> Result<
    Json<Vec<contracts::domain::a010_notification::aggregate::Notification>>,
    axum::http::StatusCode,
> {
    match a010_notification::service::list_recent(query.limit.unwrap_or(100)).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
