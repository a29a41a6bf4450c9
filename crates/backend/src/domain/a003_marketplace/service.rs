use super::repository;
use contracts::domain::a003_marketplace::aggregate::{Marketplace, MarketplaceDto};
use uuid::Uuid;

pub async fn create(dto: MarketplaceDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| dto.marketplace_type.code().to_string());

    let mut aggregate = Marketplace::new_for_insert(
        code,
        dto.description.clone(),
        dto.url.clone(),
        dto.marketplace_type,
        dto.fee_rate,
        dto.comment.clone(),
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: MarketplaceDto) -> anyhow::Result<()> {
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

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Marketplace>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Marketplace>> {
    repository::list_all().await
}
