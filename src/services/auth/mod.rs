pub mod login;
pub mod logout;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::audit::entities::OperationKind;
use crate::models::users::entities::Session;
use crate::services::AuditLogger;
use crate::storage::Storage;

pub struct AuthService {
    storage: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // 校验用户名与密码，不写入任何记录
    pub async fn verify(&self, username: &str, password: &str) -> Result<Option<Session>> {
        login::verify(self, username, password).await
    }

    // 登录：校验成功后更新最后登录时间并记录日志
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<Session>> {
        login::login(self, username, password).await
    }

    // 登出或退出
    pub async fn end_session(&self, audit: &AuditLogger, kind: OperationKind) -> Result<()> {
        logout::end_session(audit, kind).await
    }
}
