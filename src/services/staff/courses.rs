use serde_json::json;
use tracing::info;

use super::{MAX_COURSE_CREDITS, MIN_COURSE_CREDITS, StaffService};
use crate::errors::{AcademicError, Result};
use crate::models::audit::entities::OperationKind;
use crate::models::courses::{
    entities::Course,
    requests::{CreateCourseRequest, UpdateCourseRequest},
};
use crate::utils::validate::{validate_course_number, validate_credits};

pub async fn list_courses(service: &StaffService) -> Result<Vec<Course>> {
    let ctx = service.ctx();
    let department_id = service.department_id().await?;
    let courses = ctx.storage.list_courses_by_prefix(&department_id).await?;

    ctx.audit
        .log_data_access(
            "course",
            "department courses",
            Some(json!({ "department_id": department_id, "count": courses.len() })),
        )
        .await?;
    Ok(courses)
}

fn check_course_fields(number: Option<&str>, credits: Option<i32>) -> Result<()> {
    if let Some(number) = number {
        validate_course_number(number).map_err(AcademicError::validation)?;
    }
    if let Some(credits) = credits {
        validate_credits(credits, MIN_COURSE_CREDITS, MAX_COURSE_CREDITS)
            .map_err(AcademicError::validation)?;
    }
    Ok(())
}

/// 取得本院系的课程
async fn owned_course(service: &StaffService, course_id: i64) -> Result<Course> {
    let department_id = service.department_id().await?;
    let course = service
        .ctx()
        .storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Course {course_id} not found")))?;
    if course.course_prefix != department_id {
        return Err(AcademicError::authorization(format!(
            "Course {} does not belong to {department_id}",
            course.code()
        )));
    }
    Ok(course)
}

pub async fn add_course(service: &StaffService, number: &str, credits: i32) -> Result<Course> {
    let number = number.trim().to_uppercase();
    check_course_fields(Some(&number), Some(credits))?;

    let ctx = service.ctx();
    let department_id = service.department_id().await?;
    let course = ctx
        .storage
        .create_course(CreateCourseRequest {
            course_prefix: department_id,
            course_number: number,
            credits,
        })
        .await?;

    ctx.audit
        .log_data_modification(
            OperationKind::Add,
            "course",
            &course.code(),
            None,
            Some(json!({ "code": course.code(), "credits": course.credits })),
        )
        .await?;
    info!("Course {} added by {}", course.code(), ctx.identity());
    Ok(course)
}

pub async fn update_course(
    service: &StaffService,
    course_id: i64,
    mut update: UpdateCourseRequest,
) -> Result<Course> {
    update.course_number = update.course_number.map(|n| n.trim().to_uppercase());
    if update.course_number.is_none() && update.credits.is_none() {
        return Err(AcademicError::validation("Nothing to update"));
    }
    check_course_fields(update.course_number.as_deref(), update.credits)?;

    let before = owned_course(service, course_id).await?;
    let ctx = service.ctx();
    let after = ctx
        .storage
        .update_course(course_id, update)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Course {course_id} not found")))?;

    ctx.audit
        .log_data_modification(
            OperationKind::Modify,
            "course",
            &before.code(),
            Some(json!({ "code": before.code(), "credits": before.credits })),
            Some(json!({ "code": after.code(), "credits": after.credits })),
        )
        .await?;
    Ok(after)
}

pub async fn remove_course(service: &StaffService, course_id: i64) -> Result<Course> {
    let course = owned_course(service, course_id).await?;
    let ctx = service.ctx();
    if !ctx.storage.delete_course(course_id).await? {
        return Err(AcademicError::not_found(format!("Course {course_id} not found")));
    }

    ctx.audit
        .log_data_modification(
            OperationKind::Delete,
            "course",
            &course.code(),
            Some(json!({ "code": course.code(), "credits": course.credits })),
            None,
        )
        .await?;
    info!("Course {} removed by {}", course.code(), ctx.identity());
    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::setup;
    use crate::errors::AcademicError;
    use crate::models::courses::requests::UpdateCourseRequest;

    #[tokio::test]
    async fn test_course_management() {
        let (_storage, service, _dir) = setup().await;

        assert!(matches!(
            service.add_course("501", 7).await,
            Err(AcademicError::Validation(_))
        ));
        assert!(matches!(
            service.add_course("101", 3).await,
            Err(AcademicError::Conflict(_))
        ));

        let course = service.add_course("501", 2).await.unwrap();
        assert_eq!(course.code(), "CS 501");

        let updated = service
            .update_course(
                course.course_id,
                UpdateCourseRequest {
                    course_number: Some("502".to_string()),
                    credits: Some(3),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.code(), "CS 502");
        assert_eq!(updated.credits, 3);

        service.remove_course(course.course_id).await.unwrap();
        assert_eq!(service.list_courses().await.unwrap().len(), 4);
    }
}
