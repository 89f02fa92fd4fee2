// 院系信息更新请求，None 表示保持不变
#[derive(Debug, Clone, Default)]
pub struct UpdateDepartmentRequest {
    pub building: Option<String>,
    pub office: Option<String>,
}

impl UpdateDepartmentRequest {
    pub fn is_empty(&self) -> bool {
        self.building.is_none() && self.office.is_none()
    }
}
