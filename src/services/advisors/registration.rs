use tracing::info;

use super::AdvisorService;
use super::advisees::{departments, ensure_advisee};
use crate::errors::{AcademicError, Result};
use crate::models::academics::Term;
use crate::models::audit::entities::OperationKind;
use crate::models::courses::{entities::Enrollment, requests::RegisterRequest};

pub async fn register(
    service: &AdvisorService,
    student_id: &str,
    prefix: &str,
    number: &str,
    term: Term,
) -> Result<Enrollment> {
    ensure_advisee(service, student_id).await?;
    let ctx = service.ctx();
    let prefix = prefix.trim().to_uppercase();
    let number = number.trim().to_uppercase();

    let upcoming = Term::current().upcoming();
    if !upcoming.contains(&term) {
        return Err(AcademicError::validation(format!(
            "Registration is only open for upcoming terms, not {term}"
        )));
    }

    let departments = departments(service).await?;
    if !departments.iter().any(|d| d.eq_ignore_ascii_case(&prefix)) {
        return Err(AcademicError::authorization(format!(
            "Course prefix {prefix} is outside the advised departments"
        )));
    }

    let enrollment = ctx
        .storage
        .register_enrollment(RegisterRequest {
            student_id: student_id.to_string(),
            course_prefix: prefix.clone(),
            course_number: number.clone(),
            term,
        })
        .await?;

    ctx.audit
        .log_course_operation(OperationKind::Register, &prefix, &number, term, Some(student_id))
        .await?;

    info!("Registered {} for {} {} in {}", student_id, prefix, number, term);
    Ok(enrollment)
}

pub async fn drop_course(
    service: &AdvisorService,
    student_id: &str,
    prefix: &str,
    number: &str,
    term: Term,
) -> Result<Enrollment> {
    ensure_advisee(service, student_id).await?;
    let ctx = service.ctx();
    let prefix = prefix.trim().to_uppercase();
    let number = number.trim().to_uppercase();

    if term < Term::current() {
        return Err(AcademicError::validation(format!(
            "Cannot drop a course from a past term ({term})"
        )));
    }

    let dropped = ctx
        .storage
        .drop_enrollment(student_id, &prefix, &number, term)
        .await?;

    ctx.audit
        .log_course_operation(OperationKind::Drop, &prefix, &number, term, Some(student_id))
        .await?;

    info!("Dropped {} from {} {} in {}", student_id, prefix, number, term);
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::errors::AcademicError;
    use crate::models::academics::{Semester, Term};
    use crate::models::audit::requests::LogFilter;
    use crate::models::courses::{entities::EnrollmentStatus, requests::CreateCourseRequest};
    use crate::models::departments::entities::Department;
    use crate::models::people::requests::ProfileDetails;
    use crate::services::AdvisorService;
    use crate::services::gpa::format_gpa;
    use crate::services::test_support::{context, seed_person};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::temp_storage;

    async fn setup() -> (Arc<dyn Storage>, AdvisorService, tempfile::TempDir) {
        let (storage, dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);

        storage
            .upsert_department(Department {
                department_id: "CS".to_string(),
                building: Some("Science Hall".to_string()),
                office: Some("101".to_string()),
            })
            .await
            .unwrap();
        storage.ensure_major("Computer Science", 120).await.unwrap();
        storage
            .add_major_to_department("CS", "Computer Science", 120)
            .await
            .unwrap();

        let session = seed_person(&storage, "A1", "pw", ProfileDetails::Advisor { phone: None }).await;
        storage.add_advisor_department("A1", "CS").await.unwrap();

        for (id, major) in [("S1", "Computer Science"), ("S2", "History")] {
            seed_person(
                &storage,
                id,
                "pw",
                ProfileDetails::Student {
                    gender: None,
                    major: Some(major.to_string()),
                },
            )
            .await;
        }

        for number in ["101", "201", "301"] {
            storage
                .create_course(CreateCourseRequest {
                    course_prefix: "CS".to_string(),
                    course_number: number.to_string(),
                    credits: 3,
                })
                .await
                .unwrap();
        }
        let past = Term::new(Semester::Fall, 2020);
        storage
            .create_enrollment("S1", "CS", "101", past, Some("A".to_string()))
            .await
            .unwrap();
        storage
            .create_enrollment("S1", "CS", "201", past, Some("C".to_string()))
            .await
            .unwrap();

        let service = AdvisorService::new(context(&storage, session));
        (storage, service, dir)
    }

    #[tokio::test]
    async fn test_advisees_with_gpa() {
        let (_storage, service, _dir) = setup().await;
        let advisees = service.advisees().await.unwrap();
        assert_eq!(advisees.len(), 1);
        assert_eq!(advisees[0].student_id, "S1");
        assert_eq!(advisees[0].department_id, "CS");
        assert_eq!(format_gpa(advisees[0].gpa), "3.00");
    }

    #[tokio::test]
    async fn test_progress() {
        let (_storage, service, _dir) = setup().await;
        let progress = service.progress("S1").await.unwrap();
        assert_eq!(progress.hours_required, Some(120));
        assert_eq!(progress.credits_earned, 6);
        assert_eq!(progress.courses_taken, 2);
        assert_eq!(progress.percent_complete(), Some(5.0));
    }

    #[tokio::test]
    async fn test_non_advisee_refused() {
        let (_storage, service, _dir) = setup().await;
        assert!(matches!(
            service.progress("S2").await,
            Err(AcademicError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_register_and_drop_upcoming() {
        let (storage, service, _dir) = setup().await;
        let term = Term::current();

        service.register("S1", "cs", "301", term).await.unwrap();
        // 重复注册
        assert!(matches!(
            service.register("S1", "CS", "301", term).await,
            Err(AcademicError::Conflict(_))
        ));

        let courses = service.term_courses("S1", term).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].status, EnrollmentStatus::Current);

        service.drop_course("S1", "CS", "301", term).await.unwrap();
        assert!(service.term_courses("S1", term).await.unwrap().is_empty());

        let registers = storage
            .list_logs(LogFilter::KindPrefix("advisor_register".to_string()))
            .await
            .unwrap();
        assert_eq!(registers.len(), 1);
        let drops = storage
            .list_logs(LogFilter::KindPrefix("advisor_drop".to_string()))
            .await
            .unwrap();
        assert_eq!(drops.len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_past_term_and_missing_course() {
        let (_storage, service, _dir) = setup().await;
        assert!(matches!(
            service
                .register("S1", "CS", "301", Term::new(Semester::Fall, 2020))
                .await,
            Err(AcademicError::Validation(_))
        ));
        assert!(matches!(
            service.register("S1", "CS", "999", Term::current()).await,
            Err(AcademicError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_drop_past_course_refused() {
        let (_storage, service, _dir) = setup().await;
        assert!(matches!(
            service
                .drop_course("S1", "CS", "101", Term::new(Semester::Fall, 2020))
                .await,
            Err(AcademicError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_course_history_points() {
        let (_storage, service, _dir) = setup().await;
        let history = service.course_history("S1").await.unwrap();
        let total: f64 = history.iter().filter_map(|h| h.points).sum();
        assert_eq!(total, 18.0);
    }
}
