use crate::system::users::{repository as users_repository, service as users_service};
use anyhow::Result;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin1234";

/// Make sure an admin account exists so the system API is reachable on a
/// fresh database. The password must be changed after the first login.
pub async fn ensure_admin_user_exists() -> Result<()> {
    if users_repository::get_by_username(DEFAULT_ADMIN_USERNAME)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let hash = users_service::hash_password(DEFAULT_ADMIN_PASSWORD)?;
    users_repository::insert(DEFAULT_ADMIN_USERNAME, "Administrator", &hash, true).await?;
    tracing::warn!(
        "Created default admin user '{}' with the default password. Change it immediately.",
        DEFAULT_ADMIN_USERNAME
    );
    Ok(())
}
