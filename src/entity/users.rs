//! 用户实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub role_description: Option<String>,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::students::Entity")]
    Students,
    #[sea_orm(has_one = "super::instructors::Entity")]
    Instructors,
    #[sea_orm(has_one = "super::advisors::Entity")]
    Advisors,
    #[sea_orm(has_one = "super::staff::Entity")]
    Staff,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::instructors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructors.def()
    }
}

impl Related<super::advisors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Advisors.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    /// 无法识别的角色返回 None，由调用方决定如何处理
    pub fn into_user(self) -> Option<crate::models::users::entities::User> {
        use crate::models::users::entities::{User, UserRole};
        use chrono::{DateTime, Utc};

        let role = self.role.parse::<UserRole>().ok()?;
        Some(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            role,
            role_description: self.role_description,
            last_login: self
                .last_login
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
