use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::audit::entities::OperationKind;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::AuditLogger;
use crate::storage::Storage;
use crate::utils::generate_random_password;
use crate::utils::password::{hash_password, init_dummy_hash};
use crate::utils::validate::validate_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 初始化默认管理员账号
/// 如果数据库中没有管理员，则按配置的用户名创建一个
async fn seed_admin(storage: &Arc<dyn Storage>, config: &AppConfig) {
    match storage.count_users_by_role(UserRole::Admin).await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} admin(s), skipping admin seed", count);
            return;
        }
        Ok(_) => {
            info!("No admin found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count admins: {}, skipping admin seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(pwd) => {
            let validation = validate_password(&pwd);
            if !validation.is_valid {
                warn!(
                    "ADMIN_PASSWORD rejected: {}, skipping admin seed",
                    validation.error_message()
                );
                return;
            }
            pwd
        }
        Err(_) => {
            let pwd = generate_random_password(16);
            warn!("==========================================================");
            warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Generated admin password: {}", pwd);
            warn!("  Please save this password or set ADMIN_PASSWORD env var");
            warn!("==========================================================");
            pwd
        }
    };

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        username: config.seed.admin_username.clone(),
        password: password_hash,
        role: UserRole::Admin,
        role_description: Some("System Administrator".to_string()),
    };

    let user = match storage.create_user(admin_request).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
            return;
        }
    };
    info!(
        "Default admin account created successfully (ID: {}, username: {})",
        user.id, user.username
    );

    if let Err(e) = AuditLogger::new(storage.clone(), user.id, UserRole::Admin)
        .log(
            OperationKind::SystemSetup,
            "Database initialized with admin user",
            None,
        )
        .await
    {
        warn!("Failed to record system setup: {}", e);
    }
}

/// 准备启动上下文：连接数据库、执行迁移并初始化管理员
pub async fn prepare_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage, config).await;

    if !init_dummy_hash() {
        warn!("Failed to prepare the login timing hash");
    }

    Ok(StartupContext { storage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audit::requests::LogFilter;
    use crate::storage::sea_orm_storage::test_support::temp_storage;

    #[tokio::test]
    async fn test_seed_admin_once() {
        let (storage, _dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let config = AppConfig::get();

        seed_admin(&storage, config).await;
        seed_admin(&storage, config).await;

        assert_eq!(storage.count_users_by_role(UserRole::Admin).await.unwrap(), 1);
        let admin = storage
            .get_user_by_username(&config.seed.admin_username)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        let setup = storage
            .list_logs(LogFilter::KindPrefix("system_setup".to_string()))
            .await
            .unwrap();
        assert_eq!(setup.len(), 1);
    }
}
