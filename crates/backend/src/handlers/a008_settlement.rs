use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::a008_settlement;
use crate::projections::p900_profit_register;
use contracts::domain::a008_settlement::aggregate::Settlement;

/// GET /api/settlement
pub async fn list_all() -> Result<Json<Vec<Settlement>>, StatusCode> {
    match a008_settlement::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/settlement/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Settlement>, StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    match a008_settlement::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/settlement/:id/confirm
pub async fn confirm(Path(id): Path<String>) -> Result<Json<Settlement>, StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    match a008_settlement::service::confirm(uuid).await {
        Ok(settlement) => Ok(Json(settlement)),
        Err(e) => {
            tracing::warn!("Settlement confirmation rejected: {}", e);
            Err(StatusCode::CONFLICT)
        }
    }
}

/// GET /api/settlement/:id/export
///
/// CSV of the register rows this settlement posted
pub async fn export_csv(Path(id): Path<String>) -> Result<impl IntoResponse, StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    let settlement = match a008_settlement::service::get_by_id(uuid).await {
        Ok(Some(v)) => v,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    };

    let rows = match p900_profit_register::repository::list_by_settlement(&id).await {
        Ok(rows) => rows,
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    };

    let csv = match p900_profit_register::service::rows_to_csv(&rows) {
        Ok(csv) => csv,
        Err(e) => {
            tracing::error!("CSV export failed: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let filename = format!("attachment; filename=\"{}.csv\"", settlement.base.code);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        csv,
    ))
}
