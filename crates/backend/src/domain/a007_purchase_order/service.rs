use super::repository;
use contracts::domain::a007_purchase_order::aggregate::PurchaseOrder;
use uuid::Uuid;

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<PurchaseOrder>> {
    repository::get_by_id(id).await
}

pub async fn get_by_sales_order(sales_order_ref: &str) -> anyhow::Result<Option<PurchaseOrder>> {
    repository::get_by_sales_order(sales_order_ref).await
}

pub async fn list_in_transit() -> anyhow::Result<Vec<PurchaseOrder>> {
    repository::list_in_transit().await
}

pub async fn create(mut aggregate: PurchaseOrder) -> anyhow::Result<Uuid> {
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();
    repository::insert(&aggregate).await
}

pub async fn save(aggregate: &mut PurchaseOrder) -> anyhow::Result<()> {
    aggregate.before_write();
    repository::update(aggregate).await
}
