use chrono::Utc;
use contracts::domain::a009_margin_rule::aggregate::{MarginAction, MarginRule, MarginRuleId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a009_margin_rule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub marketplace_ref: Option<String>,
    pub min_margin_rate: f64,
    pub min_profit_amount: f64,
    pub action: String,
    pub priority: i32,
    pub is_enabled: bool,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MarginRule {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        MarginRule {
            base: BaseAggregate::with_metadata(
                MarginRuleId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            marketplace_ref: m.marketplace_ref,
            min_margin_rate: m.min_margin_rate,
            min_profit_amount: m.min_profit_amount,
            action: MarginAction::from_str(&m.action).unwrap_or(MarginAction::Hold),
            priority: m.priority,
            is_enabled: m.is_enabled,
        }
    }
}

fn to_active(aggregate: &MarginRule) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        marketplace_ref: Set(aggregate.marketplace_ref.clone()),
        min_margin_rate: Set(aggregate.min_margin_rate),
        min_profit_amount: Set(aggregate.min_profit_amount),
        action: Set(aggregate.action.as_str().to_string()),
        priority: Set(aggregate.priority),
        is_enabled: Set(aggregate.is_enabled),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<MarginRule>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::Priority)
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn list_enabled() -> anyhow::Result<Vec<MarginRule>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::IsEnabled.eq(true))
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<MarginRule>> {
    let result = Entity::find_by_id(id.to_string()).one(get_connection()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &MarginRule) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(get_connection()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &MarginRule) -> anyhow::Result<()> {
    to_active(aggregate).update(get_connection()).await?;
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
