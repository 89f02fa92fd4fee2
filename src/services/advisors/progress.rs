use serde_json::json;

use super::AdvisorService;
use super::advisees::ensure_advisee;
use crate::errors::Result;
use crate::models::academics::Term;
use crate::models::courses::{
    entities::EnrollmentStatus,
    responses::{CourseHistoryEntry, TermCourse},
};
use crate::models::people::responses::StudentProgress;
use crate::services::gpa::{self, GpaSummary};

pub async fn progress(service: &AdvisorService, student_id: &str) -> Result<StudentProgress> {
    let advisee = ensure_advisee(service, student_id).await?;
    let ctx = service.ctx();

    let records = ctx.storage.list_enrollment_records(student_id).await?;
    let hours_required = match advisee.major.as_deref() {
        Some(major) => ctx.storage.get_major_hours_requirement(major).await?,
        None => None,
    };

    let progress = StudentProgress {
        student_id: advisee.student_id,
        major: advisee.major,
        hours_required,
        credits_earned: gpa::credits_earned(&records),
        courses_taken: records.len(),
        gpa: GpaSummary::from_records(&records).gpa(),
    };

    ctx.audit
        .log_data_access(
            "student",
            "academic progress",
            Some(json!({ "student_id": student_id })),
        )
        .await?;
    Ok(progress)
}

pub async fn course_history(
    service: &AdvisorService,
    student_id: &str,
) -> Result<Vec<CourseHistoryEntry>> {
    ensure_advisee(service, student_id).await?;
    let ctx = service.ctx();

    let history = ctx
        .storage
        .list_enrollment_records(student_id)
        .await?
        .into_iter()
        .map(|record| CourseHistoryEntry {
            points: gpa::course_points(&record),
            record,
        })
        .collect();

    ctx.audit
        .log_data_access(
            "course",
            "course history",
            Some(json!({ "student_id": student_id })),
        )
        .await?;
    Ok(history)
}

pub async fn term_courses(
    service: &AdvisorService,
    student_id: &str,
    term: Term,
) -> Result<Vec<TermCourse>> {
    ensure_advisee(service, student_id).await?;
    let ctx = service.ctx();
    let current = Term::current();

    let courses = ctx
        .storage
        .list_enrollment_records(student_id)
        .await?
        .into_iter()
        .filter(|r| r.enrollment.term() == Some(term))
        .map(|record| TermCourse {
            record,
            status: EnrollmentStatus::relative_to(term, current),
        })
        .collect();

    ctx.audit
        .log_data_access(
            "course",
            "term courses",
            Some(json!({ "student_id": student_id, "term": term.to_string() })),
        )
        .await?;
    Ok(courses)
}
