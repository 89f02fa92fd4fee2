pub mod admin;
pub mod advisors;
pub mod audit;
pub mod auth;
pub mod gpa;
pub mod import;
pub mod instructors;
pub mod staff;
pub mod students;

use std::sync::Arc;

pub use admin::AdminService;
pub use advisors::AdvisorService;
pub use audit::AuditLogger;
pub use auth::AuthService;
pub use import::ImportService;
pub use instructors::InstructorService;
pub use staff::StaffService;
pub use students::StudentService;

use crate::config::AcademicConfig;
use crate::models::users::entities::Session;
use crate::storage::Storage;

/// 登录后各角色面板共享的上下文
#[derive(Clone)]
pub struct DashboardContext {
    pub storage: Arc<dyn Storage>,
    pub session: Session,
    pub audit: AuditLogger,
    pub academic: AcademicConfig,
}

impl DashboardContext {
    pub fn new(storage: Arc<dyn Storage>, session: Session, academic: AcademicConfig) -> Self {
        let audit = AuditLogger::new(storage.clone(), session.user_id, session.role);
        Self {
            storage,
            session,
            audit,
            academic,
        }
    }

    /// 当前用户的角色编号
    pub fn identity(&self) -> &str {
        &self.session.identity
    }
}
