use serde::{Deserialize, Serialize};

// 院系
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub department_id: String,
    pub building: Option<String>,
    pub office: Option<String>,
}

// 专业
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Major {
    pub major_name: String,
    pub default_hours_req: i32,
}

// 院系开设的专业及毕业学时要求
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentMajor {
    pub department_id: String,
    pub major_name: String,
    pub hours_req: i32,
}
