use crate::models::users::entities::UserRole;

/// 各角色档案的专属字段
#[derive(Debug, Clone)]
pub enum ProfileDetails {
    Student {
        gender: Option<String>,
        major: Option<String>,
    },
    Instructor {
        phone: Option<String>,
        department_id: Option<String>,
        hired_semester: Option<String>,
    },
    Advisor {
        phone: Option<String>,
    },
    Staff {
        department_id: Option<String>,
        phone: Option<String>,
    },
}

impl ProfileDetails {
    pub fn role(&self) -> UserRole {
        match self {
            ProfileDetails::Student { .. } => UserRole::Student,
            ProfileDetails::Instructor { .. } => UserRole::Instructor,
            ProfileDetails::Advisor { .. } => UserRole::Advisor,
            ProfileDetails::Staff { .. } => UserRole::Staff,
        }
    }
}

/// 创建或更新人员档案
///
/// `person_id` 同时作为登录用户名；`password_hash` 仅在需要新建用户时使用。
#[derive(Debug, Clone)]
pub struct UpsertPersonRequest {
    pub person_id: String,
    pub password_hash: String,
    pub details: ProfileDetails,
}

// 学生信息更新请求
#[derive(Debug, Clone, Default)]
pub struct UpdateStudentRequest {
    pub gender: Option<String>,
    pub major: Option<String>,
}

// 教师信息更新请求
#[derive(Debug, Clone, Default)]
pub struct UpdateInstructorRequest {
    pub phone: Option<String>,
    pub hired_semester: Option<String>,
}
