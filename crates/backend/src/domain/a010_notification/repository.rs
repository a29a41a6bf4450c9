use chrono::Utc;
use contracts::domain::a010_notification::aggregate::{
    Notification, NotificationId, NotificationLevel, NotificationTopic,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a010_notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub level: String,
    pub topic: String,
    pub message: String,
    pub subject_ref: Option<String>,
    pub webhook_delivered: Option<bool>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Notification {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Notification {
            base: BaseAggregate::with_metadata(
                NotificationId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            level: NotificationLevel::from_str(&m.level).unwrap_or(NotificationLevel::Info),
            topic: NotificationTopic::from_str(&m.topic)
                .unwrap_or(NotificationTopic::OrderFailed),
            message: m.message,
            subject_ref: m.subject_ref,
            webhook_delivered: m.webhook_delivered,
        }
    }
}

pub async fn insert(aggregate: &Notification) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        level: Set(aggregate.level.as_str().to_string()),
        topic: Set(aggregate.topic.as_str().to_string()),
        message: Set(aggregate.message.clone()),
        subject_ref: Set(aggregate.subject_ref.clone()),
        webhook_delivered: Set(aggregate.webhook_delivered),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    active.insert(get_connection()).await?;
    Ok(uuid)
}

pub async fn set_webhook_delivered(id: Uuid, delivered: bool) -> anyhow::Result<()> {
    Entity::update_many()
        .col_expr(Column::WebhookDelivered, Expr::value(delivered))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(get_connection())
        .await?;
    Ok(())
}

pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<Notification>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}
