use tracing::{info, warn};

use super::AuthService;
use crate::errors::Result;
use crate::models::audit::entities::OperationKind;
use crate::models::users::entities::{Session, UserRole};
use crate::services::AuditLogger;
use crate::utils::password::{verify_against_dummy, verify_password};

pub async fn verify(
    service: &AuthService,
    username: &str,
    password: &str,
) -> Result<Option<Session>> {
    let storage = service.storage();
    let username = username.trim();

    let credentials = match storage.get_user_credentials(username).await? {
        Some(credentials) => credentials,
        None => {
            // 用户不存在也要做一次哈希比对
            verify_against_dummy(password);
            info!("Login failed: unknown user {}", username);
            return Ok(None);
        }
    };

    if !verify_password(password, &credentials.password_hash) {
        info!("Login failed: wrong password for {}", username);
        return Ok(None);
    }

    // 角色在密码比对之后解析，两种失败结果一致
    let Some(role) = credentials.role else {
        warn!(
            "Login refused: user {} has unknown role '{}'",
            username, credentials.stored_role
        );
        return Ok(None);
    };

    let identity = resolve_identity(service, credentials.id, &credentials.username, role).await?;
    Ok(Some(Session {
        user_id: credentials.id,
        username: credentials.username,
        role,
        identity,
    }))
}

pub async fn login(
    service: &AuthService,
    username: &str,
    password: &str,
) -> Result<Option<Session>> {
    let Some(session) = verify(service, username, password).await? else {
        return Ok(None);
    };

    service.storage().update_last_login(session.user_id).await?;
    AuditLogger::new(service.storage().clone(), session.user_id, session.role)
        .log_session(OperationKind::Login)
        .await?;

    info!(
        "User {} logged in as {} ({})",
        session.username, session.role, session.identity
    );
    Ok(Some(session))
}

/// 角色编号：学号、教师编号、导师编号、职员编号；管理员为用户名
async fn resolve_identity(
    service: &AuthService,
    user_id: i64,
    username: &str,
    role: UserRole,
) -> Result<String> {
    let storage = service.storage();
    let identity = match role {
        UserRole::Student => storage
            .get_student_by_user_id(user_id)
            .await?
            .map(|p| p.student_id),
        UserRole::Instructor => storage
            .get_instructor_by_user_id(user_id)
            .await?
            .map(|p| p.instructor_id),
        UserRole::Advisor => storage
            .get_advisor_by_user_id(user_id)
            .await?
            .map(|p| p.advisor_id),
        UserRole::Staff => storage
            .get_staff_by_user_id(user_id)
            .await?
            .map(|p| p.staff_id),
        UserRole::Admin => Some(username.to_string()),
    };

    Ok(identity.unwrap_or_else(|| {
        warn!("User {} has no {} profile", username, role);
        username.to_string()
    }))
}
