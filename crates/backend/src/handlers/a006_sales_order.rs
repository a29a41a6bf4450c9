use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;

use crate::domain::a006_sales_order;
use contracts::domain::a006_sales_order::aggregate::{OrderStatus, SalesOrder};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct NoteBody {
    pub note: Option<String>,
}

/// GET /api/order
pub async fn list(
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SalesOrder>>, axum::http::StatusCode> {
    let result = match query.status.as_deref() {
        Some(status_str) => match OrderStatus::from_str(status_str) {
            Some(status) => a006_sales_order::service::list_by_status(status).await,
            None => return Err(axum::http::StatusCode::BAD_REQUEST),
        },
        None => {
            a006_sales_order::service::list_paginated(
                query.limit.unwrap_or(100),
                query.offset.unwrap_or(0),
            )
            .await
        }
    };
    match result {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/order/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<SalesOrder>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a006_sales_order::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/order/:id/release-hold
pub async fn release_hold(
    Path(id): Path<String>,
    body: Option<Json<NoteBody>>,
) -> Result<Json<SalesOrder>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    let note = body.and_then(|Json(b)| b.note);
    match a006_sales_order::service::release_hold(uuid, note).await {
        Ok(order) => Ok(Json(order)),
        Err(e) => {
            tracing::warn!("Hold release rejected: {}", e);
            Err(axum::http::StatusCode::CONFLICT)
        }
    }
}

/// POST /api/order/:id/cancel
pub async fn cancel(
    Path(id): Path<String>,
    body: Option<Json<NoteBody>>,
) -> Result<Json<SalesOrder>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    let reason = body.and_then(|Json(b)| b.note);
    match a006_sales_order::service::cancel(uuid, reason).await {
        Ok(order) => Ok(Json(order)),
        Err(e) => {
            tracing::warn!("Cancellation rejected: {}", e);
            Err(axum::http::StatusCode::CONFLICT)
        }
    }
}
