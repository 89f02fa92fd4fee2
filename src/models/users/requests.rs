use super::entities::UserRole;

// 用户创建请求（password 为已哈希的密码）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub role_description: Option<String>,
}
