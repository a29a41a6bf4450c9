use super::repository;
use contracts::domain::a008_settlement::aggregate::{Settlement, SettlementStatus};
use uuid::Uuid;

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Settlement>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Settlement>> {
    repository::list_all().await
}

pub async fn get_by_period(
    marketplace_ref: &str,
    period_from: chrono::NaiveDate,
    period_to: chrono::NaiveDate,
) -> anyhow::Result<Option<Settlement>> {
    repository::get_by_period(marketplace_ref, period_from, period_to).await
}

pub async fn create(mut aggregate: Settlement) -> anyhow::Result<Uuid> {
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();
    repository::insert(&aggregate).await
}

pub async fn save(aggregate: &mut Settlement) -> anyhow::Result<()> {
    aggregate.before_write();
    repository::update(aggregate).await
}

/// Freeze a draft settlement. Confirmed documents refuse recomputation.
pub async fn confirm(id: Uuid) -> anyhow::Result<Settlement> {
    let mut settlement = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Settlement not found"))?;
    if settlement.status == SettlementStatus::Confirmed {
        anyhow::bail!("Settlement is already confirmed");
    }
    settlement.status = SettlementStatus::Confirmed;
    settlement.base.metadata.is_posted = true;
    save(&mut settlement).await?;
    Ok(settlement)
}
