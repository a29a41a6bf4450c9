use crate::shared::data::db::get_connection;
use chrono::Utc;
use contracts::system::users::UserInfo;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sys_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            is_admin: self.is_admin,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Model>> {
    let users = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Username)
        .all(get_connection())
        .await?;
    Ok(users)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find_by_id(id.to_string()).one(get_connection()).await?)
}

pub async fn get_by_username(username: &str) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .filter(Column::IsDeleted.eq(false))
        .one(get_connection())
        .await?)
}

pub async fn get_by_refresh_token(refresh_token: &str) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find()
        .filter(Column::RefreshToken.eq(refresh_token))
        .filter(Column::IsDeleted.eq(false))
        .one(get_connection())
        .await?)
}

pub async fn insert(
    username: &str,
    display_name: &str,
    password_hash: &str,
    is_admin: bool,
) -> anyhow::Result<Model> {
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        username: Set(username.to_string()),
        display_name: Set(display_name.to_string()),
        password_hash: Set(password_hash.to_string()),
        is_admin: Set(is_admin),
        is_active: Set(true),
        refresh_token: Set(None),
        refresh_token_expires_at: Set(None),
        is_deleted: Set(false),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
    };
    Ok(active.insert(get_connection()).await?)
}

pub async fn save(model: Model) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(model.id),
        username: Set(model.username),
        display_name: Set(model.display_name),
        password_hash: Set(model.password_hash),
        is_admin: Set(model.is_admin),
        is_active: Set(model.is_active),
        refresh_token: Set(model.refresh_token),
        refresh_token_expires_at: Set(model.refresh_token_expires_at),
        is_deleted: Set(model.is_deleted),
        created_at: Set(model.created_at),
        updated_at: Set(Some(Utc::now())),
    };
    active.update(get_connection()).await?;
    Ok(())
}

pub async fn soft_delete(id: &str) -> anyhow::Result<bool> {
    let res = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(get_connection())
        .await?;
    Ok(res.rows_affected > 0)
}
