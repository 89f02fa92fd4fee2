use serde_json::json;

use super::StudentService;
use crate::errors::{AcademicError, Result};
use crate::models::people::entities::Student;

pub async fn personal_info(service: &StudentService) -> Result<Student> {
    let ctx = service.ctx();
    let student = ctx
        .storage
        .get_student(ctx.identity())
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Student {} not found", ctx.identity())))?;

    ctx.audit
        .log_data_access(
            "student",
            "personal info",
            Some(json!({ "student_id": student.student_id })),
        )
        .await?;
    Ok(student)
}
