use crate::shared::data::db::get_connection;
use chrono::Utc;
use contracts::shared::logger::{CreateLogEntry, LogEntry};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub level: String,
    pub source: String,
    pub message: String,
    pub details: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LogEntry {
    fn from(m: Model) -> Self {
        LogEntry {
            id: Some(m.id),
            level: m.level,
            source: m.source,
            message: m.message,
            details: m.details,
            created_at: m.created_at,
        }
    }
}

pub async fn insert(entry: CreateLogEntry) -> anyhow::Result<()> {
    let active = ActiveModel {
        level: Set(entry.level),
        source: Set(entry.source),
        message: Set(entry.message),
        details: Set(entry.details),
        created_at: Set(Some(Utc::now())),
        ..Default::default()
    };
    active.insert(get_connection()).await?;
    Ok(())
}

pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<LogEntry>> {
    let models = Entity::find()
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(get_connection())
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn clear_all() -> anyhow::Result<u64> {
    let res = Entity::delete_many().exec(get_connection()).await?;
    Ok(res.rows_affected)
}
