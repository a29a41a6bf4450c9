use super::repository;
use contracts::domain::a009_margin_rule::aggregate::{MarginRule, MarginRuleDto};
use uuid::Uuid;

pub async fn create(dto: MarginRuleDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("MR-{}", Uuid::new_v4()));

    let mut aggregate = MarginRule::new_for_insert(
        code,
        dto.description.clone(),
        dto.marketplace_ref.clone(),
        dto.min_margin_rate,
        dto.min_profit_amount,
        dto.action,
        dto.priority,
        dto.comment.clone(),
    );
    aggregate.is_enabled = dto.is_enabled;

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: MarginRuleDto) -> anyhow::Result<()> {
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

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<MarginRule>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<MarginRule>> {
    repository::list_all().await
}

pub async fn list_enabled() -> anyhow::Result<Vec<MarginRule>> {
    repository::list_enabled().await
}
