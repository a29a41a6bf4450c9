use super::repository;
use crate::system::auth::jwt;
use anyhow::Result;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use contracts::system::users::{
    ChangePasswordRequest, CreateUserRequest, LoginResponse, UpdateUserRequest, UserInfo,
};

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Verify credentials and issue access + refresh tokens
pub async fn login(username: &str, password: &str) -> Result<LoginResponse> {
    let mut user = repository::get_by_username(username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Invalid username or password"))?;
    if !user.is_active {
        anyhow::bail!("Account is disabled");
    }
    if !verify_password(password, &user.password_hash) {
        anyhow::bail!("Invalid username or password");
    }

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin).await?;
    let refresh_token = jwt::generate_refresh_token();
    user.refresh_token = Some(refresh_token.clone());
    user.refresh_token_expires_at =
        Some(Utc::now() + Duration::days(jwt::REFRESH_TOKEN_LIFETIME_DAYS));
    let user_info = user.to_user_info();
    repository::save(user).await?;

    Ok(LoginResponse {
        access_token,
        refresh_token,
        user: user_info,
    })
}

/// Rotate the refresh token and issue a fresh access token
pub async fn refresh(refresh_token: &str) -> Result<LoginResponse> {
    let mut user = repository::get_by_refresh_token(refresh_token)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Invalid refresh token"))?;
    match user.refresh_token_expires_at {
        Some(expires_at) if expires_at > Utc::now() => {}
        _ => anyhow::bail!("Refresh token expired"),
    }

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin).await?;
    let new_refresh_token = jwt::generate_refresh_token();
    user.refresh_token = Some(new_refresh_token.clone());
    user.refresh_token_expires_at =
        Some(Utc::now() + Duration::days(jwt::REFRESH_TOKEN_LIFETIME_DAYS));
    let user_info = user.to_user_info();
    repository::save(user).await?;

    Ok(LoginResponse {
        access_token,
        refresh_token: new_refresh_token,
        user: user_info,
    })
}

pub async fn logout(user_id: &str) -> Result<()> {
    if let Some(mut user) = repository::get_by_id(user_id).await? {
        user.refresh_token = None;
        user.refresh_token_expires_at = None;
        repository::save(user).await?;
    }
    Ok(())
}

pub async fn list_all() -> Result<Vec<UserInfo>> {
    let users = repository::list_all().await?;
    Ok(users.iter().map(|u| u.to_user_info()).collect())
}

pub async fn get_by_id(id: &str) -> Result<Option<UserInfo>> {
    Ok(repository::get_by_id(id).await?.map(|u| u.to_user_info()))
}

pub async fn create(request: CreateUserRequest) -> Result<UserInfo> {
    if request.username.trim().is_empty() {
        anyhow::bail!("Username must not be empty");
    }
    if request.password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }
    if repository::get_by_username(&request.username).await?.is_some() {
        anyhow::bail!("Username is already taken");
    }

    let hash = hash_password(&request.password)?;
    let user = repository::insert(
        &request.username,
        &request.display_name,
        &hash,
        request.is_admin,
    )
    .await?;
    Ok(user.to_user_info())
}

pub async fn update(id: &str, request: UpdateUserRequest) -> Result<UserInfo> {
    let mut user = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User not found"))?;

    if let Some(display_name) = request.display_name {
        user.display_name = display_name;
    }
    if let Some(is_admin) = request.is_admin {
        user.is_admin = is_admin;
    }
    if let Some(is_active) = request.is_active {
        user.is_active = is_active;
    }
    let info = user.to_user_info();
    repository::save(user).await?;
    Ok(info)
}

pub async fn delete(id: &str) -> Result<bool> {
    repository::soft_delete(id).await
}

/// Admins may skip the current password; everyone else must present it
pub async fn change_password(
    id: &str,
    request: ChangePasswordRequest,
    acting_is_admin: bool,
) -> Result<()> {
    let mut user = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User not found"))?;

    if !acting_is_admin {
        let current = request
            .current_password
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Current password is required"))?;
        if !verify_password(current, &user.password_hash) {
            anyhow::bail!("Current password is wrong");
        }
    }
    if request.new_password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    user.password_hash = hash_password(&request.new_password)?;
    user.refresh_token = None;
    user.refresh_token_expires_at = None;
    repository::save(user).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
