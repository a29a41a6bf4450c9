use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::{a003_marketplace, a004_connection_mp};
use crate::shared::marketplaces;

/// GET /api/connection_mp
pub async fn list_all() -> Result<
    Json<Vec<contracts::domain::a004_connection_mp::aggregate::ConnectionMP>>,
    axum::http::StatusCode,
> {
    match a004_connection_mp::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/connection_mp/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<
    Json<contracts::domain::a004_connection_mp::aggregate::ConnectionMP>,
    axum::http::StatusCode,
> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a004_connection_mp::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/connection_mp
pub async fn upsert(
    Json(dto): Json<contracts::domain::a004_connection_mp::aggregate::ConnectionMPDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let result = if dto.id.is_some() {
        a004_connection_mp::service::update(dto)
            .await
            .map(|_| uuid::Uuid::nil().to_string())
    } else {
        a004_connection_mp::service::create(dto).await.map(|id| id.to_string())
    };
    match result {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            tracing::error!("Connection upsert failed: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/connection_mp/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a004_connection_mp::service::delete(uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/connection_mp/test
///
/// Probes the credentials in the body against the live marketplace API
pub async fn test_connection(
    Json(dto): Json<contracts::domain::a004_connection_mp::aggregate::ConnectionMPDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let marketplace_id = match uuid::Uuid::parse_str(&dto.marketplace_ref) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    let marketplace = match a003_marketplace::service::get_by_id(marketplace_id).await {
        Ok(Some(m)) => m,
        Ok(None) => return Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    };

    let result =
        marketplaces::test_marketplace_connection(marketplace.marketplace_type, &dto).await;
    Ok(Json(json!({
        "success": result.success,
        "message": result.message,
        "details": result.details,
    })))
}
