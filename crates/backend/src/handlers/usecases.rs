use axum::{extract::Path, Json};
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::usecases;
use contracts::usecases::common::progress::SessionProgress;
use contracts::usecases::common::response::SessionStartResponse;

// ============================================================================
// UseCase u501: collect supplier catalog
// ============================================================================

pub static COLLECT_EXECUTOR: Lazy<Arc<usecases::u501_collect_from_supplier::CollectExecutor>> =
    Lazy::new(|| {
        let tracker = Arc::new(usecases::common::ProgressTracker::new());
        Arc::new(usecases::u501_collect_from_supplier::CollectExecutor::new(tracker))
    });

/// POST /api/u501/collect/start
pub async fn u501_start_collect(
    Json(request): Json<contracts::usecases::u501_collect_from_supplier::CollectRequest>,
) -> Result<Json<SessionStartResponse>, axum::http::StatusCode> {
    match COLLECT_EXECUTOR.start_collect(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to start catalog collection: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/u501/collect/:session_id/progress
pub async fn u501_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<SessionProgress>, axum::http::StatusCode> {
    match COLLECT_EXECUTOR.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(axum::http::StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// UseCase u502: register listings
// ============================================================================

pub static REGISTER_EXECUTOR: Lazy<Arc<usecases::u502_register_listings::RegisterExecutor>> =
    Lazy::new(|| {
        let tracker = Arc::new(usecases::common::ProgressTracker::new());
        Arc::new(usecases::u502_register_listings::RegisterExecutor::new(tracker))
    });

/// POST /api/u502/register/start
pub async fn u502_start_register(
    Json(request): Json<contracts::usecases::u502_register_listings::RegisterRequest>,
) -> Result<Json<SessionStartResponse>, axum::http::StatusCode> {
    match REGISTER_EXECUTOR.start_register(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to start registration batch: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/u502/register/:session_id/progress
pub async fn u502_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<SessionProgress>, axum::http::StatusCode> {
    match REGISTER_EXECUTOR.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(axum::http::StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// UseCase u503: import orders
// ============================================================================

pub static IMPORT_ORDERS_EXECUTOR: Lazy<Arc<usecases::u503_import_orders::ImportOrdersExecutor>> =
    Lazy::new(|| {
        let tracker = Arc::new(usecases::common::ProgressTracker::new());
        Arc::new(usecases::u503_import_orders::ImportOrdersExecutor::new(tracker))
    });

/// POST /api/u503/orders/start
pub async fn u503_start_import(
    Json(request): Json<contracts::usecases::u503_import_orders::ImportOrdersRequest>,
) -> Result<Json<SessionStartResponse>, axum::http::StatusCode> {
    match IMPORT_ORDERS_EXECUTOR.start_import(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to start order import: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/u503/orders/:session_id/progress
pub async fn u503_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<SessionProgress>, axum::http::StatusCode> {
    match IMPORT_ORDERS_EXECUTOR.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(axum::http::StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// UseCase u504: process orders
// ============================================================================

pub static PROCESS_ORDERS_EXECUTOR: Lazy<Arc<usecases::u504_process_orders::ProcessOrdersExecutor>> =
    Lazy::new(|| {
        let tracker = Arc::new(usecases::common::ProgressTracker::new());
        Arc::new(usecases::u504_process_orders::ProcessOrdersExecutor::new(tracker))
    });

/// POST /api/u504/process/start
pub async fn u504_start_process(
    Json(request): Json<contracts::usecases::u504_process_orders::ProcessOrdersRequest>,
) -> Result<Json<SessionStartResponse>, axum::http::StatusCode> {
    match PROCESS_ORDERS_EXECUTOR.start_process(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to start order processing: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/u504/process/:session_id/progress
pub async fn u504_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<SessionProgress>, axum::http::StatusCode> {
    match PROCESS_ORDERS_EXECUTOR.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(axum::http::StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// UseCase u505: run settlement
// ============================================================================

pub static SETTLEMENT_EXECUTOR: Lazy<Arc<usecases::u505_run_settlement::SettlementExecutor>> =
    Lazy::new(|| {
        let tracker = Arc::new(usecases::common::ProgressTracker::new());
        Arc::new(usecases::u505_run_settlement::SettlementExecutor::new(tracker))
    });

/// POST /api/u505/settlement/start
pub async fn u505_start_settlement(
    Json(request): Json<contracts::usecases::u505_run_settlement::SettlementRequest>,
) -> Result<Json<SessionStartResponse>, axum::http::StatusCode> {
    match SETTLEMENT_EXECUTOR.start_settlement(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to start settlement: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/u505/settlement/:session_id/progress
pub async fn u505_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<SessionProgress>, axum::http::StatusCode> {
    match SETTLEMENT_EXECUTOR.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(axum::http::StatusCode::NOT_FOUND),
    }
}
