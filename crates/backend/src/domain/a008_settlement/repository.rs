use chrono::Utc;
use contracts::domain::a008_settlement::aggregate::{Settlement, SettlementId, SettlementStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a008_settlement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub marketplace_ref: String,
    pub period_from: chrono::NaiveDate,
    pub period_to: chrono::NaiveDate,
    pub order_count: i32,
    pub gross_revenue: f64,
    pub platform_fees: f64,
    pub product_cost: f64,
    pub shipping_cost: f64,
    pub net_profit: f64,
    pub avg_margin_rate: f64,
    pub status: String,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Settlement {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Settlement {
            base: BaseAggregate::with_metadata(
                SettlementId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            marketplace_ref: m.marketplace_ref,
            period_from: m.period_from,
            period_to: m.period_to,
            order_count: m.order_count,
            gross_revenue: m.gross_revenue,
            platform_fees: m.platform_fees,
            product_cost: m.product_cost,
            shipping_cost: m.shipping_cost,
            net_profit: m.net_profit,
            avg_margin_rate: m.avg_margin_rate,
            status: SettlementStatus::from_str(&m.status).unwrap_or(SettlementStatus::Draft),
        }
    }
}

fn to_active(aggregate: &Settlement) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        marketplace_ref: Set(aggregate.marketplace_ref.clone()),
        period_from: Set(aggregate.period_from),
        period_to: Set(aggregate.period_to),
        order_count: Set(aggregate.order_count),
        gross_revenue: Set(aggregate.gross_revenue),
        platform_fees: Set(aggregate.platform_fees),
        product_cost: Set(aggregate.product_cost),
        shipping_cost: Set(aggregate.shipping_cost),
        net_profit: Set(aggregate.net_profit),
        avg_margin_rate: Set(aggregate.avg_margin_rate),
        status: Set(aggregate.status.as_str().to_string()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Settlement>> {
    let result = Entity::find_by_id(id.to_string()).one(get_connection()).await?;
    Ok(result.map(Into::into))
}

pub async fn list_all() -> anyhow::Result<Vec<Settlement>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::PeriodFrom)
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Settlement documents are unique per (marketplace, period)
pub async fn get_by_period(
    marketplace_ref: &str,
    period_from: chrono::NaiveDate,
    period_to: chrono::NaiveDate,
) -> anyhow::Result<Option<Settlement>> {
    let result = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::MarketplaceRef.eq(marketplace_ref))
        .filter(Column::PeriodFrom.eq(period_from))
        .filter(Column::PeriodTo.eq(period_to))
        .one(get_connection())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Settlement) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(get_connection()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &Settlement) -> anyhow::Result<()> {
    to_active(aggregate).update(get_connection()).await?;
    Ok(())
}
