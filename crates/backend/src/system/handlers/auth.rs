use crate::system::users::service;
use axum::{http::StatusCode, Extension, Json};
use contracts::system::auth::TokenClaims;
use contracts::system::users::{LoginRequest, LoginResponse, RefreshRequest, UserInfo};

/// POST /api/system/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    match service::login(&request.username, &request.password).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!("Login failed for '{}': {}", request.username, e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// POST /api/system/auth/refresh
pub async fn refresh(Json(request): Json<RefreshRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    match service::refresh(&request.refresh_token).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!("Token refresh failed: {}", e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// POST /api/system/auth/logout (requires auth)
pub async fn logout(Extension(claims): Extension<TokenClaims>) -> StatusCode {
    match service::logout(&claims.sub).await {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!("Logout failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// GET /api/system/auth/me (requires auth)
pub async fn current_user(
    Extension(claims): Extension<TokenClaims>,
) -> Result<Json<UserInfo>, StatusCode> {
    match service::get_by_id(&claims.sub).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load current user: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
