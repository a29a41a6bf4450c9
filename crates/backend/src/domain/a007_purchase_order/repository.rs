use chrono::Utc;
use contracts::domain::a007_purchase_order::aggregate::{
    PurchaseOrder, PurchaseOrderId, PurchaseOrderStatus,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a007_purchase_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub sales_order_ref: String,
    pub supplier_ref: String,
    pub supplier_product_ref: String,
    pub supplier_order_no: Option<String>,
    pub quantity: i32,
    pub cost_total: f64,
    pub shipping_fee: f64,
    pub tracking_carrier: Option<String>,
    pub tracking_no: Option<String>,
    pub status: String,
    pub attempt_count: i32,
    pub failure_reason: Option<String>,
    pub placed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PurchaseOrder {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        PurchaseOrder {
            base: BaseAggregate::with_metadata(
                PurchaseOrderId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            sales_order_ref: m.sales_order_ref,
            supplier_ref: m.supplier_ref,
            supplier_product_ref: m.supplier_product_ref,
            supplier_order_no: m.supplier_order_no,
            quantity: m.quantity,
            cost_total: m.cost_total,
            shipping_fee: m.shipping_fee,
            tracking_carrier: m.tracking_carrier,
            tracking_no: m.tracking_no,
            status: PurchaseOrderStatus::from_str(&m.status).unwrap_or(PurchaseOrderStatus::Created),
            attempt_count: m.attempt_count,
            failure_reason: m.failure_reason,
            placed_at: m.placed_at,
        }
    }
}

fn to_active(aggregate: &PurchaseOrder) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        sales_order_ref: Set(aggregate.sales_order_ref.clone()),
        supplier_ref: Set(aggregate.supplier_ref.clone()),
        supplier_product_ref: Set(aggregate.supplier_product_ref.clone()),
        supplier_order_no: Set(aggregate.supplier_order_no.clone()),
        quantity: Set(aggregate.quantity),
        cost_total: Set(aggregate.cost_total),
        shipping_fee: Set(aggregate.shipping_fee),
        tracking_carrier: Set(aggregate.tracking_carrier.clone()),
        tracking_no: Set(aggregate.tracking_no.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        attempt_count: Set(aggregate.attempt_count),
        failure_reason: Set(aggregate.failure_reason.clone()),
        placed_at: Set(aggregate.placed_at),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<PurchaseOrder>> {
    let result = Entity::find_by_id(id.to_string()).one(get_connection()).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_sales_order(sales_order_ref: &str) -> anyhow::Result<Option<PurchaseOrder>> {
    let result = Entity::find()
        .filter(Column::SalesOrderRef.eq(sales_order_ref))
        .filter(Column::IsDeleted.eq(false))
        .one(get_connection())
        .await?;
    Ok(result.map(Into::into))
}

/// Purchase orders that still need tracking polls
pub async fn list_in_transit() -> anyhow::Result<Vec<PurchaseOrder>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.is_in([
            PurchaseOrderStatus::Placed.as_str(),
            PurchaseOrderStatus::Shipped.as_str(),
        ]))
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn insert(aggregate: &PurchaseOrder) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(get_connection()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &PurchaseOrder) -> anyhow::Result<()> {
    to_active(aggregate).update(get_connection()).await?;
    Ok(())
}
