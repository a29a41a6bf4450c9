use chrono::Utc;
use contracts::domain::a005_listing::aggregate::{Listing, ListingId, ListingStatus};
use contracts::domain::a006_sales_order::aggregate::MarginSnapshot;
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub supplier_product_ref: String,
    pub marketplace_ref: String,
    pub connection_mp_ref: String,
    pub marketplace_product_id: Option<String>,
    pub sale_title: Option<String>,
    pub sale_price: f64,
    pub margin_json: Option<String>,
    pub status: String,
    pub failure_reason: Option<String>,
    pub retry_count: i32,
    pub registered_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Listing {
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

        Listing {
            base: BaseAggregate::with_metadata(
                ListingId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            supplier_product_ref: m.supplier_product_ref,
            marketplace_ref: m.marketplace_ref,
            connection_mp_ref: m.connection_mp_ref,
            marketplace_product_id: m.marketplace_product_id,
            sale_title: m.sale_title,
            sale_price: m.sale_price,
            margin_snapshot,
            status: ListingStatus::from_str(&m.status).unwrap_or(ListingStatus::Draft),
            failure_reason: m.failure_reason,
            retry_count: m.retry_count,
            registered_at: m.registered_at,
        }
    }
}

fn to_active(aggregate: &Listing) -> anyhow::Result<ActiveModel> {
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
        supplier_product_ref: Set(aggregate.supplier_product_ref.clone()),
        marketplace_ref: Set(aggregate.marketplace_ref.clone()),
        connection_mp_ref: Set(aggregate.connection_mp_ref.clone()),
        marketplace_product_id: Set(aggregate.marketplace_product_id.clone()),
        sale_title: Set(aggregate.sale_title.clone()),
        sale_price: Set(aggregate.sale_price),
        margin_json: Set(margin_json),
        status: Set(aggregate.status.as_str().to_string()),
        failure_reason: Set(aggregate.failure_reason.clone()),
        retry_count: Set(aggregate.retry_count),
        registered_at: Set(aggregate.registered_at),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    })
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Listing>> {
    let result = Entity::find_by_id(id.to_string()).one(get_connection()).await?;
    Ok(result.map(Into::into))
}

pub async fn list_all() -> anyhow::Result<Vec<Listing>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Next registration batch for one connection, oldest first
pub async fn list_pending_for_connection(
    connection_mp_ref: &str,
    limit: u64,
) -> anyhow::Result<Vec<Listing>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::ConnectionMpRef.eq(connection_mp_ref))
        .filter(Column::Status.is_in([
            ListingStatus::Pending.as_str(),
            ListingStatus::Draft.as_str(),
        ]))
        .limit(limit)
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Map an incoming order back to its listing
pub async fn get_by_marketplace_product_id(
    connection_mp_ref: &str,
    marketplace_product_id: &str,
) -> anyhow::Result<Option<Listing>> {
    let result = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::ConnectionMpRef.eq(connection_mp_ref))
        .filter(Column::MarketplaceProductId.eq(marketplace_product_id))
        .one(get_connection())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Listing) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate)?.insert(get_connection()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &Listing) -> anyhow::Result<()> {
    to_active(aggregate)?.update(get_connection()).await?;
    Ok(())
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
