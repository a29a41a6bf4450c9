use chrono::Utc;
use contracts::domain::a002_supplier_product::aggregate::{
    SupplierProduct, SupplierProductId, SupplierProductStatus,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_supplier_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub supplier_ref: String,
    pub supplier_sku: String,
    pub cost_price: f64,
    pub list_price: Option<f64>,
    pub stock: i32,
    pub shipping_fee: f64,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub detail_html: Option<String>,
    pub status: String,
    pub collected_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SupplierProduct {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        SupplierProduct {
            base: BaseAggregate::with_metadata(
                SupplierProductId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            supplier_ref: m.supplier_ref,
            supplier_sku: m.supplier_sku,
            cost_price: m.cost_price,
            list_price: m.list_price,
            stock: m.stock,
            shipping_fee: m.shipping_fee,
            category: m.category,
            brand: m.brand,
            detail_html: m.detail_html,
            status: SupplierProductStatus::from_str(&m.status)
                .unwrap_or(SupplierProductStatus::Active),
            collected_at: m.collected_at,
        }
    }
}

fn to_active(aggregate: &SupplierProduct) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        supplier_ref: Set(aggregate.supplier_ref.clone()),
        supplier_sku: Set(aggregate.supplier_sku.clone()),
        cost_price: Set(aggregate.cost_price),
        list_price: Set(aggregate.list_price),
        stock: Set(aggregate.stock),
        shipping_fee: Set(aggregate.shipping_fee),
        category: Set(aggregate.category.clone()),
        brand: Set(aggregate.brand.clone()),
        detail_html: Set(aggregate.detail_html.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        collected_at: Set(aggregate.collected_at),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<SupplierProduct>> {
    let result = Entity::find_by_id(id.to_string()).one(get_connection()).await?;
    Ok(result.map(Into::into))
}

/// Lookup by the natural key used during collection upserts
pub async fn get_by_supplier_sku(
    supplier_ref: &str,
    supplier_sku: &str,
) -> anyhow::Result<Option<SupplierProduct>> {
    let result = Entity::find()
        .filter(Column::SupplierRef.eq(supplier_ref))
        .filter(Column::SupplierSku.eq(supplier_sku))
        .filter(Column::IsDeleted.eq(false))
        .one(get_connection())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn list_by_supplier(supplier_ref: &str) -> anyhow::Result<Vec<SupplierProduct>> {
    let items = Entity::find()
        .filter(Column::SupplierRef.eq(supplier_ref))
        .filter(Column::IsDeleted.eq(false))
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn list_paginated(limit: u64, offset: u64) -> anyhow::Result<Vec<SupplierProduct>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .limit(limit)
        .offset(offset)
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn insert(aggregate: &SupplierProduct) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(get_connection()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &SupplierProduct) -> anyhow::Result<()> {
    to_active(aggregate).update(get_connection()).await?;
    Ok(())
}

/// Mark every item of the supplier not collected after `cutoff` as soldout.
/// Returns the number of affected rows.
pub async fn mark_stale_soldout(
    supplier_ref: &str,
    cutoff: chrono::DateTime<chrono::Utc>,
) -> anyhow::Result<u64> {
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(SupplierProductStatus::Soldout.as_str()))
        .col_expr(Column::Stock, Expr::value(0))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::SupplierRef.eq(supplier_ref))
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.eq(SupplierProductStatus::Active.as_str()))
        .filter(Column::CollectedAt.lt(cutoff))
        .exec(get_connection())
        .await?;
    Ok(res.rows_affected)
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    let res = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(get_connection())
        .await?;
    Ok(res.rows_affected > 0)
}
