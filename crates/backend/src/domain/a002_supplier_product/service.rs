use super::repository;
use crate::shared::html::sanitize_detail_html;
use crate::shared::suppliers::CollectedItem;
use contracts::domain::a002_supplier_product::aggregate::SupplierProduct;
use uuid::Uuid;

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<SupplierProduct>> {
    repository::get_by_id(id).await
}

pub async fn list_by_supplier(supplier_ref: &str) -> anyhow::Result<Vec<SupplierProduct>> {
    repository::list_by_supplier(supplier_ref).await
}

pub async fn list_paginated(limit: u64, offset: u64) -> anyhow::Result<Vec<SupplierProduct>> {
    repository::list_paginated(limit, offset).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Outcome of one collected-item upsert
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Upsert one collected item by (supplier, sku). HTML detail content is
/// sanitized before it reaches the database.
pub async fn upsert_collected(
    supplier_ref: &str,
    default_shipping_fee: f64,
    item: &CollectedItem,
) -> anyhow::Result<UpsertOutcome> {
    let detail_html = item.detail_html.as_deref().map(sanitize_detail_html);
    let shipping_fee = item.shipping_fee.unwrap_or(default_shipping_fee);

    match repository::get_by_supplier_sku(supplier_ref, &item.sku).await? {
        Some(mut existing) => {
            existing.apply_collected(
                item.name.clone(),
                item.cost_price,
                item.list_price,
                item.stock,
                shipping_fee,
                item.category.clone(),
                item.brand.clone(),
                detail_html,
            );
            existing
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
            existing.before_write();
            repository::update(&existing).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            let mut aggregate = SupplierProduct::new_for_insert(
                format!("SP-{}", &item.sku),
                item.name.clone(),
                supplier_ref.to_string(),
                item.sku.clone(),
                item.cost_price,
                item.list_price,
                item.stock,
                shipping_fee,
                item.category.clone(),
                item.brand.clone(),
                detail_html,
                None,
            );
            aggregate
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
            aggregate.before_write();
            repository::insert(&aggregate).await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Soldout sweep after a full collection run
pub async fn mark_stale_soldout(
    supplier_ref: &str,
    cutoff: chrono::DateTime<chrono::Utc>,
) -> anyhow::Result<u64> {
    repository::mark_stale_soldout(supplier_ref, cutoff).await
}
