use super::repository;
use contracts::domain::a005_listing::aggregate::{Listing, ListingDto, ListingStatus};
use uuid::Uuid;

pub async fn create(dto: ListingDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("LST-{}", Uuid::new_v4()));

    let mut aggregate = Listing::new_for_insert(
        code,
        dto.description.clone(),
        dto.supplier_product_ref.clone(),
        dto.marketplace_ref.clone(),
        dto.connection_mp_ref.clone(),
        dto.sale_price,
        dto.comment.clone(),
    );
    if let Some(status) = dto.status {
        aggregate.status = status;
    }

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: ListingDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    aggregate.base.description = dto.description.clone();
    aggregate.base.comment = dto.comment.clone();
    aggregate.supplier_product_ref = dto.supplier_product_ref.clone();
    aggregate.marketplace_ref = dto.marketplace_ref.clone();
    aggregate.connection_mp_ref = dto.connection_mp_ref.clone();
    aggregate.sale_price = dto.sale_price;
    if let Some(status) = dto.status {
        aggregate.status = status;
    }

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Listing>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Listing>> {
    repository::list_all().await
}

pub async fn list_pending_for_connection(
    connection_mp_ref: &str,
    limit: u64,
) -> anyhow::Result<Vec<Listing>> {
    repository::list_pending_for_connection(connection_mp_ref, limit).await
}

pub async fn get_by_marketplace_product_id(
    connection_mp_ref: &str,
    marketplace_product_id: &str,
) -> anyhow::Result<Option<Listing>> {
    repository::get_by_marketplace_product_id(connection_mp_ref, marketplace_product_id).await
}

/// Queue a draft listing for the next registration batch
pub async fn queue_for_registration(id: Uuid) -> anyhow::Result<()> {
    let mut listing = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;
    if listing.status == ListingStatus::Registered {
        anyhow::bail!("Listing is already registered");
    }
    listing.status = ListingStatus::Pending;
    listing.failure_reason = None;
    listing.before_write();
    repository::update(&listing).await
}

pub async fn save(listing: &mut Listing) -> anyhow::Result<()> {
    listing.before_write();
    repository::update(listing).await
}
