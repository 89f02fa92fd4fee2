use serde_json::json;

use super::StaffService;
use crate::errors::{AcademicError, Result};
use crate::models::audit::entities::OperationKind;
use crate::models::departments::{
    entities::Department, requests::UpdateDepartmentRequest, responses::DepartmentOverview,
};

pub async fn department_info(service: &StaffService) -> Result<DepartmentOverview> {
    let ctx = service.ctx();
    let department_id = service.department_id().await?;
    let department = ctx
        .storage
        .get_department(&department_id)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Department {department_id} not found")))?;
    let majors = ctx.storage.list_department_majors(&department_id).await?;

    ctx.audit
        .log_data_access(
            "department",
            "department info",
            Some(json!({ "department_id": department_id })),
        )
        .await?;
    Ok(DepartmentOverview { department, majors })
}

pub async fn update_department(
    service: &StaffService,
    update: UpdateDepartmentRequest,
) -> Result<Department> {
    if update.is_empty() {
        return Err(AcademicError::validation("Nothing to update"));
    }
    let ctx = service.ctx();
    let department_id = service.department_id().await?;

    let before = ctx
        .storage
        .get_department(&department_id)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Department {department_id} not found")))?;
    let after = ctx
        .storage
        .update_department(&department_id, update)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Department {department_id} not found")))?;

    ctx.audit
        .log_data_modification(
            OperationKind::Modify,
            "department",
            &department_id,
            Some(json!({ "building": before.building, "office": before.office })),
            Some(json!({ "building": after.building, "office": after.office })),
        )
        .await?;
    Ok(after)
}
