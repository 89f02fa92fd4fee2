use serde::{Deserialize, Serialize};

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub user_id: i64,
    pub student_id: String,
    pub gender: Option<String>,
    pub major: Option<String>,
}

// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instructor {
    pub user_id: i64,
    pub instructor_id: String,
    pub phone: Option<String>,
    pub department_id: Option<String>,
    pub hired_semester: Option<String>,
}

// 导师档案
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Advisor {
    pub user_id: i64,
    pub advisor_id: String,
    pub phone: Option<String>,
}

// 院系职员档案
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffMember {
    pub user_id: i64,
    pub staff_id: String,
    pub department_id: Option<String>,
    pub phone: Option<String>,
}
