use super::repository;
use contracts::domain::a004_connection_mp::aggregate::{ConnectionMP, ConnectionMPDto};
use uuid::Uuid;

pub async fn create(dto: ConnectionMPDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("CONN-MP-{}", Uuid::new_v4()));

    let mut aggregate = ConnectionMP::new_for_insert(
        code,
        dto.description.clone(),
        dto.marketplace_ref.clone(),
        dto.vendor_id.clone(),
        dto.access_key.clone(),
        dto.secret_key.clone(),
        dto.client_id.clone(),
        dto.client_secret.clone(),
        dto.api_key.clone(),
        dto.fee_rate_override,
        dto.test_mode,
        dto.comment.clone(),
    );
    aggregate.is_used = dto.is_used;

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: ConnectionMPDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ConnectionMP>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<ConnectionMP>> {
    repository::list_all().await
}

pub async fn list_used() -> anyhow::Result<Vec<ConnectionMP>> {
    repository::list_used().await
}

/// Commission rate for pricing and margin checks: the account override when
/// set, otherwise the marketplace default
pub async fn effective_fee_rate(connection: &ConnectionMP) -> anyhow::Result<f64> {
    if let Some(rate) = connection.fee_rate_override {
        return Ok(rate);
    }
    let marketplace_id = Uuid::parse_str(&connection.marketplace_ref)
        .map_err(|_| anyhow::anyhow!("Invalid marketplace reference"))?;
    let marketplace = crate::domain::a003_marketplace::service::get_by_id(marketplace_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Marketplace not found"))?;
    Ok(marketplace.fee_rate)
}
