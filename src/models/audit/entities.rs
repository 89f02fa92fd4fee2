use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::models::users::entities::UserRole;

/// 操作类型
///
/// 存储时写作 `<角色>_<类型>`，错误记录与初始化记录不带角色前缀。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Login,
    Logout,
    Exit,
    View,
    Add,
    Modify,
    Delete,
    Register,
    Drop,
    Assign,
    Analysis,
    Clear,
    Filter,
    Error,
    SystemSetup,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Login => "login",
            OperationKind::Logout => "logout",
            OperationKind::Exit => "exit",
            OperationKind::View => "view",
            OperationKind::Add => "add",
            OperationKind::Modify => "modify",
            OperationKind::Delete => "delete",
            OperationKind::Register => "register",
            OperationKind::Drop => "drop",
            OperationKind::Assign => "assign",
            OperationKind::Analysis => "analysis",
            OperationKind::Clear => "clear",
            OperationKind::Filter => "filter",
            OperationKind::Error => "error",
            OperationKind::SystemSetup => "system_setup",
        }
    }

    /// 存储用的操作类型字符串
    pub fn stored_for(&self, role: UserRole) -> String {
        match self {
            OperationKind::Error | OperationKind::SystemSetup => self.as_str().to_string(),
            _ => format!("{}_{}", role, self.as_str()),
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// 操作日志
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationLog {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub operation_type: String,
    pub details: String,
}

impl OperationLog {
    /// 本地时间格式的时间戳
    pub fn local_timestamp(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// 带操作者角色的日志，用户已不存在时角色为空
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OperationLogView {
    pub log: OperationLog,
    pub role: Option<UserRole>,
}

impl OperationLogView {
    pub fn role_label(&self) -> &'static str {
        self.role.map(|r| r.label()).unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_kind_has_role_prefix() {
        assert_eq!(
            OperationKind::Register.stored_for(UserRole::Advisor),
            "advisor_register"
        );
        assert_eq!(OperationKind::Clear.stored_for(UserRole::Admin), "admin_clear");
    }

    #[test]
    fn test_error_and_setup_are_unprefixed() {
        assert_eq!(OperationKind::Error.stored_for(UserRole::Student), "error");
        assert_eq!(
            OperationKind::SystemSetup.stored_for(UserRole::Admin),
            "system_setup"
        );
    }

    #[test]
    fn test_unknown_role_label() {
        let view = OperationLogView {
            log: OperationLog {
                id: 1,
                created_at: Utc::now(),
                user_id: 99,
                operation_type: "student_login".to_string(),
                details: String::new(),
            },
            role: None,
        };
        assert_eq!(view.role_label(), "Unknown");
    }
}
