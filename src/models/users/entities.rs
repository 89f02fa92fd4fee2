use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,    // 学生
    Instructor, // 教师
    Advisor,    // 导师
    Staff,      // 院系职员
    Admin,      // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const INSTRUCTOR: &'static str = "instructor";
    pub const ADVISOR: &'static str = "advisor";
    pub const STAFF: &'static str = "staff";
    pub const ADMIN: &'static str = "admin";

    pub fn all_roles() -> &'static [UserRole] {
        &[
            Self::Student,
            Self::Instructor,
            Self::Advisor,
            Self::Staff,
            Self::Admin,
        ]
    }

    /// 首字母大写的显示名称
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Student => "Student",
            UserRole::Instructor => "Instructor",
            UserRole::Advisor => "Advisor",
            UserRole::Staff => "Staff",
            UserRole::Admin => "Admin",
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user role: '{s}'. Supported roles: student, instructor, advisor, staff, admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Instructor => write!(f, "{}", UserRole::INSTRUCTOR),
            UserRole::Advisor => write!(f, "{}", UserRole::ADVISOR),
            UserRole::Staff => write!(f, "{}", UserRole::STAFF),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::INSTRUCTOR => Ok(UserRole::Instructor),
            UserRole::ADVISOR => Ok(UserRole::Advisor),
            UserRole::STAFF => Ok(UserRole::Staff),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub role_description: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 登录校验读取的用户记录
///
/// 角色在密码比对之后才解析，无法识别的角色为 None。
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Option<UserRole>,
    pub stored_role: String,
}

/// 登录会话
///
/// `identity` 为角色对应的编号（学号、教师编号等），管理员为用户名。
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
    pub identity: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in UserRole::all_roles() {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), *role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("professor".parse::<UserRole>().is_err());
        assert!("Admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_label() {
        assert_eq!(UserRole::Advisor.label(), "Advisor");
        assert_eq!(UserRole::Staff.to_string(), "staff");
    }
}
