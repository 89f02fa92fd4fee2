//! 操作日志存储实现

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::SeaOrmStorage;
use crate::entity::operation_logs::{ActiveModel, Column};
use crate::entity::prelude::{OperationLogs, Users};
use crate::entity::users;
use crate::errors::{AcademicError, Result};
use crate::models::{
    audit::{
        entities::{OperationLog, OperationLogView},
        requests::{LogFilter, NewOperationLog},
    },
    users::entities::UserRole,
};

/// 本地日期当天的起止时间戳（左闭右开）
fn local_day_bounds(date: NaiveDate) -> Result<(i64, i64)> {
    let to_ts = |d: NaiveDate| {
        d.and_hms_opt(0, 0, 0)
            .and_then(|dt| dt.and_local_timezone(Local).earliest())
            .map(|dt| dt.timestamp())
            .ok_or_else(|| AcademicError::date_parse(format!("Cannot convert date: {d}")))
    };
    let next = date
        .succ_opt()
        .ok_or_else(|| AcademicError::date_parse(format!("Date out of range: {date}")))?;
    Ok((to_ts(date)?, to_ts(next)?))
}

impl SeaOrmStorage {
    /// 追加一条日志
    pub async fn append_log_impl(&self, log: NewOperationLog) -> Result<OperationLog> {
        let model = ActiveModel {
            created_at: Set(chrono::Utc::now().timestamp()),
            user_id: Set(log.user_id),
            operation_type: Set(log.operation_type),
            details: Set(log.details),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to write operation log: {e}")))?;

        Ok(model.into_log())
    }

    /// 按条件列出日志，附带操作者角色
    pub async fn list_logs_impl(&self, filter: LogFilter) -> Result<Vec<OperationLogView>> {
        let mut select = OperationLogs::find();

        match &filter {
            LogFilter::All => {}
            LogFilter::Date(date) => {
                let (start, end) = local_day_bounds(*date)?;
                select = select
                    .filter(Column::CreatedAt.gte(start))
                    .filter(Column::CreatedAt.lt(end));
            }
            LogFilter::Actor(user_id) => {
                select = select.filter(Column::UserId.eq(*user_id));
            }
            LogFilter::KindPrefix(prefix) => {
                // LIKE 中的 `_` 为通配符，下面再做一次精确过滤
                select = select.filter(Column::OperationType.starts_with(prefix.to_lowercase()));
            }
        }

        let mut logs: Vec<OperationLog> = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query operation logs: {e}")))?
            .into_iter()
            .map(|m| m.into_log())
            .collect();

        if let LogFilter::KindPrefix(prefix) = &filter {
            let prefix = prefix.to_lowercase();
            logs.retain(|log| log.operation_type.to_lowercase().starts_with(&prefix));
        }

        let mut user_ids: Vec<i64> = logs.iter().map(|l| l.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let roles: HashMap<i64, UserRole> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(&self.db)
                .await
                .map_err(|e| AcademicError::database_operation(format!("Failed to query user: {e}")))?
                .into_iter()
                .filter_map(|u| u.role.parse::<UserRole>().ok().map(|r| (u.id, r)))
                .collect()
        };

        Ok(logs
            .into_iter()
            .map(|log| OperationLogView {
                role: roles.get(&log.user_id).copied(),
                log,
            })
            .collect())
    }

    /// 出现过的操作者 ID
    pub async fn list_log_actors_impl(&self) -> Result<Vec<i64>> {
        OperationLogs::find()
            .select_only()
            .column(Column::UserId)
            .distinct()
            .order_by_asc(Column::UserId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query log actors: {e}")))
    }

    pub async fn count_logs_impl(&self) -> Result<u64> {
        OperationLogs::find()
            .count(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to count operation logs: {e}")))
    }

    /// 清空日志，并在同一事务中写入清空记录
    pub async fn clear_logs_impl(&self, clear_record: NewOperationLog) -> Result<OperationLog> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let deleted = OperationLogs::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to clear operation logs: {e}")))?;

        let record = ActiveModel {
            created_at: Set(chrono::Utc::now().timestamp()),
            user_id: Set(clear_record.user_id),
            operation_type: Set(clear_record.operation_type),
            details: Set(format!(
                "{} | Data: deleted_records: {}",
                clear_record.details, deleted.rows_affected
            )),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to write operation log: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to commit transaction: {e}")))?;

        Ok(record.into_log())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::temp_storage;
    use super::local_day_bounds;
    use crate::models::audit::requests::{LogFilter, NewOperationLog};
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::Storage;
    use chrono::{Local, NaiveDate};

    fn log(user_id: i64, kind: &str) -> NewOperationLog {
        NewOperationLog {
            user_id,
            operation_type: kind.to_string(),
            details: format!("{kind} happened"),
        }
    }

    #[test]
    fn test_local_day_bounds_span_one_day() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let (start, end) = local_day_bounds(date).unwrap();
        assert!(end > start);
        assert!(end - start >= 23 * 3600 && end - start <= 25 * 3600);
    }

    #[tokio::test]
    async fn test_append_increments_count_by_one() {
        let (storage, _dir) = temp_storage().await;
        assert_eq!(storage.count_logs().await.unwrap(), 0);
        storage.append_log(log(1, "student_login")).await.unwrap();
        assert_eq!(storage.count_logs().await.unwrap(), 1);
        storage.append_log(log(1, "student_view")).await.unwrap();
        assert_eq!(storage.count_logs().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_filters_and_roles() {
        let (storage, _dir) = temp_storage().await;
        let admin = storage
            .create_user(CreateUserRequest {
                username: "SA01".to_string(),
                password: "hash".to_string(),
                role: UserRole::Admin,
                role_description: None,
            })
            .await
            .unwrap();
        storage.append_log(log(admin.id, "admin_login")).await.unwrap();
        storage.append_log(log(42, "advisor_register")).await.unwrap();
        storage.append_log(log(42, "advisorXregister")).await.unwrap();

        let all = storage.list_logs(LogFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);
        // 最新在前
        assert_eq!(all[0].log.operation_type, "advisorXregister");
        assert_eq!(all[2].role_label(), "Admin");
        assert_eq!(all[0].role_label(), "Unknown");

        let by_actor = storage.list_logs(LogFilter::Actor(42)).await.unwrap();
        assert_eq!(by_actor.len(), 2);

        let by_kind = storage
            .list_logs(LogFilter::KindPrefix("ADVISOR_".to_string()))
            .await
            .unwrap();
        assert_eq!(by_kind.len(), 1);
        assert_eq!(by_kind[0].log.operation_type, "advisor_register");

        let today = storage
            .list_logs(LogFilter::Date(Local::now().date_naive()))
            .await
            .unwrap();
        assert_eq!(today.len(), 3);
        let long_ago = storage
            .list_logs(LogFilter::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()))
            .await
            .unwrap();
        assert!(long_ago.is_empty());

        assert_eq!(storage.list_log_actors().await.unwrap(), vec![admin.id, 42]);
    }

    #[tokio::test]
    async fn test_clear_leaves_single_record() {
        let (storage, _dir) = temp_storage().await;
        for _ in 0..5 {
            storage.append_log(log(7, "staff_view")).await.unwrap();
        }
        let record = storage.clear_logs(log(1, "admin_clear")).await.unwrap();
        assert!(record.details.contains("deleted_records: 5"));

        let remaining = storage.list_logs(LogFilter::All).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].log.operation_type, "admin_clear");
    }
}
