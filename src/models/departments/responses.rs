use serde::Serialize;

use super::entities::{Department, DepartmentMajor};

// 院系概览
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DepartmentOverview {
    pub department: Department,
    pub majors: Vec<DepartmentMajor>,
}
