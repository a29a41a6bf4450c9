use super::repository;
use contracts::domain::a006_sales_order::aggregate::{OrderStatus, SalesOrder};
use uuid::Uuid;

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<SalesOrder>> {
    repository::get_by_id(id).await
}

pub async fn list_by_status(status: OrderStatus) -> anyhow::Result<Vec<SalesOrder>> {
    repository::list_by_status(status).await
}

pub async fn list_paginated(limit: u64, offset: u64) -> anyhow::Result<Vec<SalesOrder>> {
    repository::list_paginated(limit, offset).await
}

pub async fn save(order: &mut SalesOrder) -> anyhow::Result<()> {
    order.before_write();
    repository::update(order).await
}

/// Operator action: release a margin-held order back into the pipeline
pub async fn release_hold(id: Uuid, note: Option<String>) -> anyhow::Result<SalesOrder> {
    let mut order = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Order not found"))?;
    order
        .transition_to(OrderStatus::Validated, note.or_else(|| Some("hold released".into())))
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    save(&mut order).await?;
    Ok(order)
}

/// Operator action: cancel an order while cancellation is still legal
pub async fn cancel(id: Uuid, reason: Option<String>) -> anyhow::Result<SalesOrder> {
    let mut order = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Order not found"))?;
    order
        .transition_to(OrderStatus::Cancelled, reason)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    save(&mut order).await?;
    Ok(order)
}
