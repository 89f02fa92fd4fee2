use serde_json::json;

use super::StaffService;
use crate::errors::{AcademicError, Result};
use crate::models::academics::Term;
use crate::models::audit::entities::OperationKind;
use crate::models::people::{
    entities::{Instructor, Student},
    requests::{UpdateInstructorRequest, UpdateStudentRequest},
};
use crate::utils::validate::validate_phone;

pub async fn list_instructors(service: &StaffService) -> Result<Vec<Instructor>> {
    let ctx = service.ctx();
    let department_id = service.department_id().await?;
    let instructors = ctx
        .storage
        .list_instructors_by_department(&department_id)
        .await?;

    ctx.audit
        .log_data_access(
            "instructor",
            "department instructors",
            Some(json!({ "department_id": department_id, "count": instructors.len() })),
        )
        .await?;
    Ok(instructors)
}

pub async fn update_instructor(
    service: &StaffService,
    instructor_id: &str,
    update: UpdateInstructorRequest,
) -> Result<Instructor> {
    if update.phone.is_none() && update.hired_semester.is_none() {
        return Err(AcademicError::validation("Nothing to update"));
    }
    if let Some(phone) = update.phone.as_deref() {
        validate_phone(phone).map_err(AcademicError::validation)?;
    }
    if let Some(hired) = update.hired_semester.as_deref() {
        hired
            .parse::<Term>()
            .map_err(AcademicError::validation)?;
    }

    let ctx = service.ctx();
    let department_id = service.department_id().await?;
    let before = ctx
        .storage
        .get_instructor(instructor_id)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Instructor {instructor_id} not found")))?;
    if before.department_id.as_deref() != Some(department_id.as_str()) {
        return Err(AcademicError::authorization(format!(
            "Instructor {instructor_id} is not in {department_id}"
        )));
    }

    let after = ctx
        .storage
        .update_instructor(instructor_id, update)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Instructor {instructor_id} not found")))?;

    ctx.audit
        .log_data_modification(
            OperationKind::Modify,
            "instructor",
            instructor_id,
            Some(json!({ "phone": before.phone, "hired_semester": before.hired_semester })),
            Some(json!({ "phone": after.phone, "hired_semester": after.hired_semester })),
        )
        .await?;
    Ok(after)
}

async fn department_majors(service: &StaffService) -> Result<Vec<String>> {
    let department_id = service.department_id().await?;
    Ok(service
        .ctx()
        .storage
        .list_department_majors(&department_id)
        .await?
        .into_iter()
        .map(|dm| dm.major_name)
        .collect())
}

pub async fn list_students(service: &StaffService) -> Result<Vec<Student>> {
    let ctx = service.ctx();
    let majors = department_majors(service).await?;
    let students = ctx.storage.list_students_by_majors(&majors).await?;

    ctx.audit
        .log_data_access(
            "student",
            "department students",
            Some(json!({ "majors": majors.join(", "), "count": students.len() })),
        )
        .await?;
    Ok(students)
}

pub async fn update_student(
    service: &StaffService,
    student_id: &str,
    update: UpdateStudentRequest,
) -> Result<Student> {
    if update.gender.is_none() && update.major.is_none() {
        return Err(AcademicError::validation("Nothing to update"));
    }

    let ctx = service.ctx();
    let majors = department_majors(service).await?;
    let before = ctx
        .storage
        .get_student(student_id)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Student {student_id} not found")))?;

    let in_department = |major: Option<&str>| major.is_some_and(|m| majors.iter().any(|d| d == m));
    if !in_department(before.major.as_deref()) {
        return Err(AcademicError::authorization(format!(
            "Student {student_id} is not in this department"
        )));
    }
    if let Some(major) = update.major.as_deref()
        && !in_department(Some(major))
    {
        return Err(AcademicError::validation(format!(
            "Major {major} is not offered by this department"
        )));
    }

    let after = ctx
        .storage
        .update_student(student_id, update)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Student {student_id} not found")))?;

    ctx.audit
        .log_data_modification(
            OperationKind::Modify,
            "student",
            student_id,
            Some(json!({ "gender": before.gender, "major": before.major })),
            Some(json!({ "gender": after.gender, "major": after.major })),
        )
        .await?;
    Ok(after)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::setup;
    use crate::errors::AcademicError;
    use crate::models::people::requests::{UpdateInstructorRequest, UpdateStudentRequest};

    #[tokio::test]
    async fn test_student_updates_within_department() {
        let (_storage, service, _dir) = setup().await;

        assert_eq!(service.list_students().await.unwrap().len(), 1);
        assert!(matches!(
            service
                .update_student(
                    "S1",
                    UpdateStudentRequest {
                        gender: None,
                        major: Some("History".to_string()),
                    },
                )
                .await,
            Err(AcademicError::Validation(_))
        ));
        let student = service
            .update_student(
                "S1",
                UpdateStudentRequest {
                    gender: Some("F".to_string()),
                    major: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(student.gender.as_deref(), Some("F"));
    }

    #[tokio::test]
    async fn test_instructor_updates_within_department() {
        let (_storage, service, _dir) = setup().await;

        let instructors = service.list_instructors().await.unwrap();
        assert_eq!(instructors.len(), 1);
        assert_eq!(instructors[0].instructor_id, "I1");

        let updated = service
            .update_instructor(
                "I1",
                UpdateInstructorRequest {
                    phone: Some("555-0100".to_string()),
                    hired_semester: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));

        assert!(matches!(
            service
                .update_instructor(
                    "I2",
                    UpdateInstructorRequest {
                        phone: Some("555-0100".to_string()),
                        hired_semester: None,
                    },
                )
                .await,
            Err(AcademicError::Authorization(_))
        ));
        assert!(matches!(
            service
                .update_instructor(
                    "I1",
                    UpdateInstructorRequest {
                        phone: None,
                        hired_semester: Some("someday".to_string()),
                    },
                )
                .await,
            Err(AcademicError::Validation(_))
        ));
    }
}
