use serde_json::json;
use tracing::info;

use super::StaffService;
use crate::errors::{AcademicError, Result};
use crate::models::academics::Term;
use crate::models::audit::entities::OperationKind;
use crate::models::courses::{
    entities::CourseSection, requests::ScheduleSectionRequest, responses::SectionDetail,
};

pub async fn list_sections(service: &StaffService) -> Result<Vec<SectionDetail>> {
    let ctx = service.ctx();
    let department_id = service.department_id().await?;
    let sections = ctx.storage.list_sections_by_prefix(&department_id).await?;

    ctx.audit
        .log_data_access(
            "section",
            "department sections",
            Some(json!({ "department_id": department_id, "count": sections.len() })),
        )
        .await?;
    Ok(sections)
}

fn max_load(service: &StaffService) -> i32 {
    i32::try_from(service.ctx().academic.max_instructor_credits).unwrap_or(i32::MAX)
}

/// 教师须属于本院系
async fn ensure_department_instructor(
    service: &StaffService,
    department_id: &str,
    instructor_id: &str,
) -> Result<()> {
    let instructor = service
        .ctx()
        .storage
        .get_instructor(instructor_id)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Instructor {instructor_id} not found")))?;
    if instructor.department_id.as_deref() != Some(department_id) {
        return Err(AcademicError::authorization(format!(
            "Instructor {instructor_id} is not in {department_id}"
        )));
    }
    Ok(())
}

pub async fn schedule_section(
    service: &StaffService,
    number: &str,
    term: Term,
    instructor_id: Option<&str>,
) -> Result<CourseSection> {
    if !Term::current().upcoming().contains(&term) {
        return Err(AcademicError::validation(format!(
            "Sections can only be scheduled for upcoming terms, not {term}"
        )));
    }

    let ctx = service.ctx();
    let department_id = service.department_id().await?;
    let instructor_id = instructor_id.map(str::trim).filter(|i| !i.is_empty());
    if let Some(instructor_id) = instructor_id {
        ensure_department_instructor(service, &department_id, instructor_id).await?;
    }

    let number = number.trim().to_uppercase();
    let section = ctx
        .storage
        .schedule_section(
            ScheduleSectionRequest {
                course_prefix: department_id.clone(),
                course_number: number.clone(),
                term,
                instructor_id: instructor_id.map(str::to_string),
            },
            max_load(service),
        )
        .await?;

    ctx.audit
        .log(
            OperationKind::Add,
            &format!("Scheduled {} {} for {}", department_id, number, term),
            Some(&json!({ "section_id": section.id, "instructor": section.instructor_label() })),
        )
        .await?;
    info!("Section {} scheduled by {}", section.id, ctx.identity());
    Ok(section)
}

pub async fn assign_instructor(
    service: &StaffService,
    section_id: i64,
    instructor_id: &str,
) -> Result<CourseSection> {
    let ctx = service.ctx();
    let department_id = service.department_id().await?;
    let section = ctx
        .storage
        .get_section(section_id)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Section {section_id} not found")))?;
    if section.course_prefix != department_id {
        return Err(AcademicError::authorization(format!(
            "Section {section_id} does not belong to {department_id}"
        )));
    }
    let instructor_id = instructor_id.trim();
    ensure_department_instructor(service, &department_id, instructor_id).await?;

    let updated = ctx
        .storage
        .assign_instructor(section_id, instructor_id, max_load(service))
        .await?;

    let term = updated.term().ok_or_else(|| {
        AcademicError::validation(format!("Section {section_id} has an invalid term"))
    })?;
    ctx.audit
        .log_course_operation(
            OperationKind::Assign,
            &updated.course_prefix,
            &updated.course_number,
            term,
            None,
        )
        .await?;
    info!(
        "Instructor {} assigned to section {} by {}",
        instructor_id,
        section_id,
        ctx.identity()
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::setup;
    use crate::errors::AcademicError;
    use crate::models::academics::Term;
    use crate::models::audit::requests::LogFilter;

    #[tokio::test]
    async fn test_schedule_respects_load_limit() {
        let (_storage, service, _dir) = setup().await;
        let term = Term::current();

        for number in ["101", "201", "301"] {
            service.schedule_section(number, term, Some("I1")).await.unwrap();
        }
        // 12 学分已满
        assert!(matches!(
            service.schedule_section("401", term, Some("I1")).await,
            Err(AcademicError::Validation(_))
        ));
        // 同一课程同一学期重复开设
        assert!(matches!(
            service.schedule_section("101", term, None).await,
            Err(AcademicError::Conflict(_))
        ));

        let tba = service.schedule_section("401", term, None).await.unwrap();
        assert_eq!(tba.instructor_label(), "TBA");
        assert!(matches!(
            service.assign_instructor(tba.id, "I1").await,
            Err(AcademicError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_assign_to_tba_section() {
        let (storage, service, _dir) = setup().await;
        let term = Term::current().next();
        let section = service.schedule_section("401", term, None).await.unwrap();

        let assigned = service.assign_instructor(section.id, "I1").await.unwrap();
        assert_eq!(assigned.instructor_id.as_deref(), Some("I1"));
        assert!(matches!(
            service.assign_instructor(section.id, "I1").await,
            Err(AcademicError::Conflict(_))
        ));

        let logs = storage
            .list_logs(LogFilter::KindPrefix("staff_assign".to_string()))
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[tokio::test]
    async fn test_other_department_instructor_refused() {
        let (_storage, service, _dir) = setup().await;
        assert!(matches!(
            service.schedule_section("101", Term::current(), Some("I2")).await,
            Err(AcademicError::Authorization(_))
        ));
    }
}
