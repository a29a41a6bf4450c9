use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;

use crate::domain::a002_supplier_product;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub supplier: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// GET /api/supplier_product
pub async fn list(
    Query(query): Query<ListQuery>,
) -> Result<
    Json<Vec<contracts::domain::a002_supplier_product::aggregate::SupplierProduct>>,
    axum::http::StatusCode,
> {
    let result = match &query.supplier {
        Some(supplier_ref) => {
            a002_supplier_product::service::list_by_supplier(supplier_ref).await
        }
        None => {
            a002_supplier_product::service::list_paginated(
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

/// GET /api/supplier_product/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<
    Json<contracts::domain::a002_supplier_product::aggregate::SupplierProduct>,
    axum::http::StatusCode,
> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a002_supplier_product::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/supplier_product/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a002_supplier_product::service::delete(uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
