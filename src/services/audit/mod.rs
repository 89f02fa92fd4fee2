//! 审计日志记录器
//!
//! 每个登录会话持有一个记录器，操作类型自动加上角色前缀。
//! 写入失败会返回错误，由调用方展示给用户。

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::errors::Result;
use crate::models::{
    academics::Term,
    audit::{entities::OperationKind, entities::OperationLog, requests::NewOperationLog},
    users::entities::UserRole,
};
use crate::storage::Storage;

#[derive(Clone)]
pub struct AuditLogger {
    storage: Arc<dyn Storage>,
    user_id: i64,
    role: UserRole,
}

/// 将附加数据格式化为 `k: v | k: v`，空对象返回 None
pub fn format_affected_data(data: &Value) -> Option<String> {
    let render = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    match data {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => Some(
            map.iter()
                .map(|(k, v)| format!("{k}: {}", render(v)))
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        other => Some(render(other)),
    }
}

/// 拼接日志详情与附加数据
pub fn compose_details(details: &str, data: Option<&Value>) -> String {
    match data.and_then(format_affected_data) {
        Some(formatted) => format!("{details} | Data: {formatted}"),
        None => details.to_string(),
    }
}

impl AuditLogger {
    pub fn new(storage: Arc<dyn Storage>, user_id: i64, role: UserRole) -> Self {
        Self {
            storage,
            user_id,
            role,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    /// 写入一条日志
    pub async fn log(
        &self,
        kind: OperationKind,
        details: &str,
        data: Option<&Value>,
    ) -> Result<OperationLog> {
        let operation_type = kind.stored_for(self.role);
        debug!("Audit {} by user {}", operation_type, self.user_id);
        self.storage
            .append_log(NewOperationLog {
                user_id: self.user_id,
                operation_type,
                details: compose_details(details, data),
            })
            .await
    }

    /// 会话事件：登录、登出、退出
    pub async fn log_session(&self, kind: OperationKind) -> Result<OperationLog> {
        let action = match kind {
            OperationKind::Login => "Login",
            OperationKind::Logout => "Logout",
            OperationKind::Exit => "Exit",
            other => other.as_str(),
        };
        let details = format!("{} {}", self.role.label(), action);
        self.log(kind, &details, None).await
    }

    /// 数据查看
    pub async fn log_data_access(
        &self,
        data_type: &str,
        action: &str,
        identifiers: Option<Value>,
    ) -> Result<OperationLog> {
        let details = format!("Accessed {data_type} data - {action}");
        self.log(OperationKind::View, &details, identifiers.as_ref())
            .await
    }

    /// 数据变更，附带变更前后的状态
    pub async fn log_data_modification(
        &self,
        kind: OperationKind,
        data_type: &str,
        action: &str,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Result<OperationLog> {
        let verb = match kind {
            OperationKind::Add => "Added",
            OperationKind::Delete => "Deleted",
            _ => "Modified",
        };
        let details = format!("{verb} {data_type} - {action}");

        let mut data = Map::new();
        if let Some(before) = before {
            data.insert("before".to_string(), before);
        }
        if let Some(after) = after {
            data.insert("after".to_string(), after);
        }
        self.log(kind, &details, Some(&Value::Object(data))).await
    }

    /// 课程相关操作：选课、退课、排课、指派教师
    pub async fn log_course_operation(
        &self,
        kind: OperationKind,
        prefix: &str,
        number: &str,
        term: Term,
        student_id: Option<&str>,
    ) -> Result<OperationLog> {
        let mut details = format!("Course: {prefix} {number} | Term: {term}");
        if let Some(student_id) = student_id {
            details = format!("Student: {student_id} | {details}");
        }
        let data = json!({
            "prefix": prefix,
            "number": number,
            "semester": term.semester.code(),
            "year": term.year,
        });
        self.log(kind, &details, Some(&data)).await
    }

    /// GPA 分析
    pub async fn log_analysis(
        &self,
        analysis_type: &str,
        parameters: Value,
        results: Value,
        student_id: Option<&str>,
    ) -> Result<OperationLog> {
        let mut details = format!("Analysis Type: {analysis_type}");
        if let Some(student_id) = student_id {
            details = format!("Student: {student_id} | {details}");
        }
        let data = json!({
            "parameters": parameters,
            "results": results,
        });
        self.log(OperationKind::Analysis, &details, Some(&data))
            .await
    }

    /// 错误记录，不带角色前缀
    pub async fn log_error(
        &self,
        context: &str,
        error: &dyn std::fmt::Display,
    ) -> Result<OperationLog> {
        let details = format!("Error in {context}: {error}");
        self.log(OperationKind::Error, &details, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::academics::Semester;
    use crate::models::audit::requests::LogFilter;
    use crate::storage::sea_orm_storage::test_support::temp_storage;

    #[test]
    fn test_format_affected_data() {
        let data = json!({"student": "S1", "credits": 3});
        assert_eq!(
            format_affected_data(&data).as_deref(),
            Some("credits: 3 | student: S1")
        );
        assert_eq!(format_affected_data(&json!({})), None);
        assert_eq!(format_affected_data(&Value::Null), None);
    }

    #[test]
    fn test_compose_details() {
        assert_eq!(compose_details("Viewed", None), "Viewed");
        assert_eq!(
            compose_details("Viewed", Some(&json!({"a": "b"}))),
            "Viewed | Data: a: b"
        );
    }

    #[tokio::test]
    async fn test_logger_prefixes_role_and_counts() {
        let (storage, _dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let logger = AuditLogger::new(storage.clone(), 5, UserRole::Advisor);

        logger.log_session(OperationKind::Login).await.unwrap();
        assert_eq!(storage.count_logs().await.unwrap(), 1);

        let record = logger
            .log_course_operation(
                OperationKind::Register,
                "CS",
                "101",
                Term::new(Semester::Fall, 2025),
                Some("S1"),
            )
            .await
            .unwrap();
        assert_eq!(record.operation_type, "advisor_register");
        assert!(record.details.starts_with("Student: S1 | Course: CS 101 | Term: F 2025"));
        assert_eq!(storage.count_logs().await.unwrap(), 2);

        let error = logger.log_error("register", &"boom").await.unwrap();
        assert_eq!(error.operation_type, "error");

        let logs = storage.list_logs(LogFilter::Actor(5)).await.unwrap();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[2].log.details, "Advisor Login");
    }
}
