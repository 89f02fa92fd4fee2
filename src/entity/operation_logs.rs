//! 操作日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "operation_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_at: i64,
    pub user_id: i64,
    pub operation_type: String,
    pub details: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_log(self) -> crate::models::audit::entities::OperationLog {
        use chrono::{DateTime, Utc};

        crate::models::audit::entities::OperationLog {
            id: self.id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            user_id: self.user_id,
            operation_type: self.operation_type,
            details: self.details,
        }
    }
}
