use chrono::Utc;
use contracts::domain::a004_connection_mp::aggregate::{ConnectionMP, ConnectionMPId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_connection_mp")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub marketplace_ref: String,
    pub vendor_id: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_key: Option<String>,
    pub fee_rate_override: Option<f64>,
    pub is_used: bool,
    pub test_mode: bool,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ConnectionMP {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        ConnectionMP {
            base: BaseAggregate::with_metadata(
                ConnectionMPId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            marketplace_ref: m.marketplace_ref,
            vendor_id: m.vendor_id,
            access_key: m.access_key,
            secret_key: m.secret_key,
            client_id: m.client_id,
            client_secret: m.client_secret,
            api_key: m.api_key,
            fee_rate_override: m.fee_rate_override,
            is_used: m.is_used,
            test_mode: m.test_mode,
        }
    }
}

fn to_active(aggregate: &ConnectionMP) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        marketplace_ref: Set(aggregate.marketplace_ref.clone()),
        vendor_id: Set(aggregate.vendor_id.clone()),
        access_key: Set(aggregate.access_key.clone()),
        secret_key: Set(aggregate.secret_key.clone()),
        client_id: Set(aggregate.client_id.clone()),
        client_secret: Set(aggregate.client_secret.clone()),
        api_key: Set(aggregate.api_key.clone()),
        fee_rate_override: Set(aggregate.fee_rate_override),
        is_used: Set(aggregate.is_used),
        test_mode: Set(aggregate.test_mode),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<ConnectionMP>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn list_used() -> anyhow::Result<Vec<ConnectionMP>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::IsUsed.eq(true))
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ConnectionMP>> {
    let result = Entity::find_by_id(id.to_string()).one(get_connection()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &ConnectionMP) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(get_connection()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &ConnectionMP) -> anyhow::Result<()> {
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
