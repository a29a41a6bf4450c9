use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;

use crate::domain::a007_purchase_order;
use contracts::domain::a007_purchase_order::aggregate::PurchaseOrder;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sales_order: Option<String>,
}

/// GET /api/purchase_order
pub async fn list(
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PurchaseOrder>>, axum::http::StatusCode> {
    let result = match &query.sales_order {
        Some(sales_order_ref) => a007_purchase_order::service::get_by_sales_order(sales_order_ref)
            .await
            .map(|opt| opt.into_iter().collect()),
        None => a007_purchase_order::service::list_in_transit().await,
    };
    match result {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/purchase_order/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<PurchaseOrder>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a007_purchase_order::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
