use chrono::Utc;
use contracts::domain::a006_sales_order::aggregate::{
    MarginSnapshot, OrderStatus, SalesOrder, SalesOrderId, StatusChange,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a006_sales_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub marketplace_order_no: String,
    pub marketplace_ref: String,
    pub connection_mp_ref: String,
    pub listing_ref: Option<String>,
    pub ordered_at: chrono::DateTime<chrono::Utc>,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub buyer_name: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_address: String,
    pub receiver_zip: Option<String>,
    pub margin_json: Option<String>,
    pub status: String,
    pub status_history: String,
    pub failure_reason: Option<String>,
    pub retry_count: i32,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SalesOrder {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let margin_snapshot: Option<MarginSnapshot> = m
            .margin_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok());
        let status_history: Vec<StatusChange> =
            serde_json::from_str(&m.status_history).unwrap_or_default();

        SalesOrder {
            base: BaseAggregate::with_metadata(
                SalesOrderId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            marketplace_order_no: m.marketplace_order_no,
            marketplace_ref: m.marketplace_ref,
            connection_mp_ref: m.connection_mp_ref,
            listing_ref: m.listing_ref,
            ordered_at: m.ordered_at,
            quantity: m.quantity,
            unit_price: m.unit_price,
            total_price: m.total_price,
            buyer_name: m.buyer_name,
            receiver_name: m.receiver_name,
            receiver_phone: m.receiver_phone,
            receiver_address: m.receiver_address,
            receiver_zip: m.receiver_zip,
            margin_snapshot,
            status: OrderStatus::from_str(&m.status).unwrap_or(OrderStatus::Received),
            status_history,
            failure_reason: m.failure_reason,
            retry_count: m.retry_count,
        }
    }
}

fn to_active(aggregate: &SalesOrder) -> anyhow::Result<ActiveModel> {
    let margin_json = aggregate
        .margin_snapshot
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        marketplace_order_no: Set(aggregate.marketplace_order_no.clone()),
        marketplace_ref: Set(aggregate.marketplace_ref.clone()),
        connection_mp_ref: Set(aggregate.connection_mp_ref.clone()),
        listing_ref: Set(aggregate.listing_ref.clone()),
        ordered_at: Set(aggregate.ordered_at),
        quantity: Set(aggregate.quantity),
        unit_price: Set(aggregate.unit_price),
        total_price: Set(aggregate.total_price),
        buyer_name: Set(aggregate.buyer_name.clone()),
        receiver_name: Set(aggregate.receiver_name.clone()),
        receiver_phone: Set(aggregate.receiver_phone.clone()),
        receiver_address: Set(aggregate.receiver_address.clone()),
        receiver_zip: Set(aggregate.receiver_zip.clone()),
        margin_json: Set(margin_json),
        status: Set(aggregate.status.as_str().to_string()),
        status_history: Set(serde_json::to_string(&aggregate.status_history)?),
        failure_reason: Set(aggregate.failure_reason.clone()),
        retry_count: Set(aggregate.retry_count),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    })
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<SalesOrder>> {
    let result = Entity::find_by_id(id.to_string()).one(get_connection()).await?;
    Ok(result.map(Into::into))
}

/// Dedupe key for order import
pub async fn get_by_order_no(
    marketplace_ref: &str,
    marketplace_order_no: &str,
) -> anyhow::Result<Option<SalesOrder>> {
    let result = Entity::find()
        .filter(Column::MarketplaceRef.eq(marketplace_ref))
        .filter(Column::MarketplaceOrderNo.eq(marketplace_order_no))
        .filter(Column::IsDeleted.eq(false))
        .one(get_connection())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn list_by_status(status: OrderStatus) -> anyhow::Result<Vec<SalesOrder>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.eq(status.as_str()))
        .order_by_asc(Column::OrderedAt)
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn list_by_statuses(statuses: &[OrderStatus]) -> anyhow::Result<Vec<SalesOrder>> {
    let codes: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.is_in(codes))
        .order_by_asc(Column::OrderedAt)
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn list_paginated(limit: u64, offset: u64) -> anyhow::Result<Vec<SalesOrder>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::OrderedAt)
        .limit(limit)
        .offset(offset)
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Delivered orders of one marketplace inside a settlement period
pub async fn list_delivered_in_period(
    marketplace_ref: &str,
    from: chrono::DateTime<chrono::Utc>,
    to: chrono::DateTime<chrono::Utc>,
) -> anyhow::Result<Vec<SalesOrder>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::MarketplaceRef.eq(marketplace_ref))
        .filter(Column::Status.eq(OrderStatus::Delivered.as_str()))
        .filter(Column::OrderedAt.gte(from))
        .filter(Column::OrderedAt.lt(to))
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn insert(aggregate: &SalesOrder) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate)?.insert(get_connection()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &SalesOrder) -> anyhow::Result<()> {
    to_active(aggregate)?.update(get_connection()).await?;
    Ok(())
}
