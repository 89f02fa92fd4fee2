use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users, Model};
use crate::errors::{AcademicError, Result};
use crate::models::users::{
    entities::{User, UserCredentials, UserRole},
    requests::CreateUserRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use tracing::warn;

/// 转换为业务模型，角色无法识别时记录警告并报错
pub(super) fn to_user(model: Model) -> Result<User> {
    let id = model.id;
    let role = model.role.clone();
    model.into_user().ok_or_else(|| {
        warn!("User {} has unknown role '{}'", id, role);
        AcademicError::database_operation(format!("User {id} has an invalid role: {role}"))
    })
}

/// 插入用户记录，可在事务中调用
pub(super) async fn insert_user<C: ConnectionTrait>(
    conn: &C,
    req: CreateUserRequest,
) -> Result<Model> {
    let now = chrono::Utc::now().timestamp();

    let model = ActiveModel {
        username: Set(req.username),
        password_hash: Set(req.password),
        role: Set(req.role.to_string()),
        role_description: Set(req.role_description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model
        .insert(conn)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to create user: {e}")))
}

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        if self.get_user_by_username_impl(&req.username).await?.is_some() {
            return Err(AcademicError::conflict(format!(
                "Username already exists: {}",
                req.username
            )));
        }
        let model = insert_user(&self.db, req).await?;
        to_user(model)
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query user: {e}")))?;

        result.map(to_user).transpose()
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query user: {e}")))?;

        result.map(to_user).transpose()
    }

    /// 读取登录凭据，角色原样保留
    pub async fn get_user_credentials_impl(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|model| UserCredentials {
            id: model.id,
            role: model.role.parse::<UserRole>().ok(),
            username: model.username,
            password_hash: model.password_hash,
            stored_role: model.role,
        }))
    }

    /// 统计某角色的用户数量
    pub async fn count_users_by_role_impl(&self, role: UserRole) -> Result<u64> {
        Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to count users: {e}")))
    }

    /// 更新最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let Some(model) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query user: {e}")))?
        else {
            return Ok(false);
        };

        let now = chrono::Utc::now().timestamp();
        let mut active: ActiveModel = model.into();
        active.last_login = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to update last login: {e}")))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::temp_storage;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::Storage;

    fn admin_request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            password: "hash".to_string(),
            role: UserRole::Admin,
            role_description: Some("System Administrator".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let (storage, _dir) = temp_storage().await;
        let user = storage.create_user(admin_request("SA01")).await.unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.last_login.is_none());

        let found = storage.get_user_by_username("SA01").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(storage.get_user_by_username("nobody").await.unwrap().is_none());
        assert_eq!(storage.count_users_by_role(UserRole::Admin).await.unwrap(), 1);
        assert_eq!(storage.count_users_by_role(UserRole::Student).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let (storage, _dir) = temp_storage().await;
        storage.create_user(admin_request("SA01")).await.unwrap();
        let err = storage.create_user(admin_request("SA01")).await.unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let (storage, _dir) = temp_storage().await;
        let user = storage.create_user(admin_request("SA01")).await.unwrap();
        assert!(storage.update_last_login(user.id).await.unwrap());
        assert!(!storage.update_last_login(user.id + 100).await.unwrap());
        let user = storage.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn test_credentials_lookup() {
        let (storage, _dir) = temp_storage().await;
        storage.create_user(admin_request("SA01")).await.unwrap();

        let credentials = storage.get_user_credentials("SA01").await.unwrap().unwrap();
        assert_eq!(credentials.role, Some(UserRole::Admin));
        assert_eq!(credentials.stored_role, "admin");
        assert_eq!(credentials.password_hash, "hash");
        assert!(storage.get_user_credentials("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_role_rejected_by_schema() {
        use sea_orm::ConnectionTrait;

        let (storage, _dir) = temp_storage().await;
        let result = storage
            .db
            .execute_unprepared(
                "INSERT INTO users (username, password_hash, role, created_at, updated_at) \
                 VALUES ('S1', 'hash', 'Student', 0, 0)",
            )
            .await;
        assert!(result.is_err());
    }
}
