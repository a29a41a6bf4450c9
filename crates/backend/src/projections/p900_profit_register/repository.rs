use chrono::Utc;
use contracts::projections::p900_profit_register::dto::{ProfitRegisterQuery, ProfitRegisterRow};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "p900_profit_register")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub marketplace_ref: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub marketplace_order_no: String,
    pub registrar_ref: String,
    pub settlement_ref: String,
    pub sale_date: chrono::NaiveDate,
    pub quantity: i32,
    pub revenue: f64,
    pub platform_fee: f64,
    pub product_cost: f64,
    pub shipping_cost: f64,
    pub profit: f64,
    pub margin_rate: f64,
    pub posted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProfitRegisterRow {
    fn from(m: Model) -> Self {
        ProfitRegisterRow {
            marketplace_ref: m.marketplace_ref,
            marketplace_order_no: m.marketplace_order_no,
            registrar_ref: m.registrar_ref,
            settlement_ref: m.settlement_ref,
            sale_date: m.sale_date,
            quantity: m.quantity,
            revenue: m.revenue,
            platform_fee: m.platform_fee,
            product_cost: m.product_cost,
            shipping_cost: m.shipping_cost,
            profit: m.profit,
            margin_rate: m.margin_rate,
            posted_at: m.posted_at,
        }
    }
}

/// Idempotent post: re-posting a key replaces the previous row
pub async fn upsert(row: &ProfitRegisterRow) -> anyhow::Result<()> {
    let db = get_connection();
    let existing = Entity::find_by_id((row.marketplace_ref.clone(), row.marketplace_order_no.clone()))
        .one(db)
        .await?;

    let active = ActiveModel {
        marketplace_ref: Set(row.marketplace_ref.clone()),
        marketplace_order_no: Set(row.marketplace_order_no.clone()),
        registrar_ref: Set(row.registrar_ref.clone()),
        settlement_ref: Set(row.settlement_ref.clone()),
        sale_date: Set(row.sale_date),
        quantity: Set(row.quantity),
        revenue: Set(row.revenue),
        platform_fee: Set(row.platform_fee),
        product_cost: Set(row.product_cost),
        shipping_cost: Set(row.shipping_cost),
        profit: Set(row.profit),
        margin_rate: Set(row.margin_rate),
        posted_at: Set(Utc::now()),
    };

    if existing.is_some() {
        active.update(db).await?;
    } else {
        active.insert(db).await?;
    }
    Ok(())
}

pub async fn list(query: &ProfitRegisterQuery) -> anyhow::Result<Vec<ProfitRegisterRow>> {
    let mut find = Entity::find();
    if let Some(mp) = &query.marketplace_ref {
        find = find.filter(Column::MarketplaceRef.eq(mp.clone()));
    }
    if let Some(from) = query.date_from {
        find = find.filter(Column::SaleDate.gte(from));
    }
    if let Some(to) = query.date_to {
        find = find.filter(Column::SaleDate.lte(to));
    }

    let rows = find
        .order_by_desc(Column::SaleDate)
        .limit(query.limit.unwrap_or(200))
        .offset(query.offset.unwrap_or(0))
        .all(get_connection())
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_all_rows() -> anyhow::Result<Vec<ProfitRegisterRow>> {
    let rows = Entity::find()
        .order_by_asc(Column::SaleDate)
        .all(get_connection())
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_by_settlement(settlement_ref: &str) -> anyhow::Result<Vec<ProfitRegisterRow>> {
    let rows = Entity::find()
        .filter(Column::SettlementRef.eq(settlement_ref))
        .order_by_asc(Column::SaleDate)
        .all(get_connection())
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Remove everything a settlement posted (used before a draft recompute)
pub async fn delete_by_settlement(settlement_ref: &str) -> anyhow::Result<u64> {
    let res = Entity::delete_many()
        .filter(Column::SettlementRef.eq(settlement_ref))
        .exec(get_connection())
        .await?;
    Ok(res.rows_affected)
}
