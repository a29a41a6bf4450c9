use crate::system::users::service;
use axum::extract::Path;
use axum::{http::StatusCode, Extension, Json};
use contracts::system::auth::TokenClaims;
use contracts::system::users::{
    ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserInfo,
};

/// GET /api/system/users (admin)
pub async fn list() -> Result<Json<Vec<UserInfo>>, StatusCode> {
    match service::list_all().await {
        Ok(users) => Ok(Json(users)),
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/system/users/:id (admin)
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<UserInfo>, StatusCode> {
    match service::get_by_id(&id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load user: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/system/users (admin)
pub async fn create(Json(request): Json<CreateUserRequest>) -> Result<Json<UserInfo>, StatusCode> {
    match service::create(request).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => {
            tracing::warn!("User creation rejected: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// PUT /api/system/users/:id (admin)
pub async fn update(
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserInfo>, StatusCode> {
    match service::update(&id, request).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => {
            tracing::warn!("User update rejected: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// DELETE /api/system/users/:id (admin)
pub async fn delete(Path(id): Path<String>) -> StatusCode {
    match service::delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            tracing::error!("User deletion failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// POST /api/system/users/:id/change-password (self or admin)
pub async fn change_password(
    Path(id): Path<String>,
    Extension(claims): Extension<TokenClaims>,
    Json(request): Json<ChangePasswordRequest>,
) -> StatusCode {
    if claims.sub != id && !claims.is_admin {
        return StatusCode::FORBIDDEN;
    }
    match service::change_password(&id, request, claims.is_admin).await {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::warn!("Password change rejected: {}", e);
            StatusCode::BAD_REQUEST
        }
    }
}
