use axum::{extract::Path, Json};
use serde_json::json;

use crate::system::tasks::service;
use contracts::system::tasks::aggregate::{ScheduledTask, ScheduledTaskId};
use contracts::system::tasks::request::{CreateScheduledTaskDto, UpdateScheduledTaskDto};

fn parse_id(id: &str) -> Result<ScheduledTaskId, axum::http::StatusCode> {
    uuid::Uuid::parse_str(id)
        .map(ScheduledTaskId)
        .map_err(|_| axum::http::StatusCode::BAD_REQUEST)
}

/// GET /api/sys/tasks
pub async fn list_all() -> Result<Json<Vec<ScheduledTask>>, axum::http::StatusCode> {
    match service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/sys/tasks/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<ScheduledTask>, axum::http::StatusCode> {
    let task_id = parse_id(&id)?;
    match service::get_by_id(&task_id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/sys/tasks
pub async fn create(
    Json(dto): Json<CreateScheduledTaskDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    match service::create(dto).await {
        Ok(id) => Ok(Json(json!({"id": id.0.to_string()}))),
        Err(e) => {
            tracing::error!("Task creation failed: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// PUT /api/sys/tasks/:id
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<UpdateScheduledTaskDto>,
) -> Result<(), axum::http::StatusCode> {
    let task_id = parse_id(&id)?;
    match service::update(&task_id, dto).await {
        Ok(_) => Ok(()),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/sys/tasks/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    let task_id = parse_id(&id)?;
    match service::delete(&task_id).await {
        Ok(_) => Ok(()),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ToggleBody {
    pub is_enabled: bool,
}

/// POST /api/sys/tasks/:id/toggle
pub async fn toggle(
    Path(id): Path<String>,
    Json(body): Json<ToggleBody>,
) -> Result<(), axum::http::StatusCode> {
    let task_id = parse_id(&id)?;
    match service::toggle_enabled(&task_id, body.is_enabled).await {
        Ok(_) => Ok(()),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
