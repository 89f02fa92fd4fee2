use serde_json::json;

use super::StudentService;
use crate::errors::Result;
use crate::models::courses::responses::EnrollmentRecord;
use crate::services::gpa::{GpaSummary, analysis};

pub async fn enrolled_courses(service: &StudentService) -> Result<Vec<EnrollmentRecord>> {
    let ctx = service.ctx();
    let records = ctx.storage.list_enrollment_records(ctx.identity()).await?;

    ctx.audit
        .log_data_access(
            "course",
            "enrolled courses",
            Some(json!({ "student_id": ctx.identity(), "count": records.len() })),
        )
        .await?;
    Ok(records)
}

pub async fn current_gpa(service: &StudentService) -> Result<GpaSummary> {
    let (_, summary) = analysis::load_summary(service.ctx(), service.ctx().identity()).await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::models::academics::{Grade, Semester, Term};
    use crate::models::audit::requests::LogFilter;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::people::requests::ProfileDetails;
    use crate::services::StudentService;
    use crate::services::gpa::{HypotheticalCourse, format_gpa};
    use crate::services::test_support::{context, seed_person};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::temp_storage;

    async fn setup() -> (Arc<dyn Storage>, StudentService, tempfile::TempDir) {
        let (storage, dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let session = seed_person(
            &storage,
            "S1",
            "pw",
            ProfileDetails::Student {
                gender: Some("M".to_string()),
                major: Some("Computer Science".to_string()),
            },
        )
        .await;

        for (number, credits) in [("101", 3), ("201", 3)] {
            storage
                .create_course(CreateCourseRequest {
                    course_prefix: "CS".to_string(),
                    course_number: number.to_string(),
                    credits,
                })
                .await
                .unwrap();
        }
        let term = Term::new(Semester::Fall, 2024);
        storage
            .create_enrollment("S1", "CS", "101", term, Some("A".to_string()))
            .await
            .unwrap();
        storage
            .create_enrollment("S1", "CS", "201", term, Some("B".to_string()))
            .await
            .unwrap();

        let service = StudentService::new(context(&storage, session));
        (storage, service, dir)
    }

    #[tokio::test]
    async fn test_current_gpa() {
        let (_storage, service, _dir) = setup().await;
        let summary = service.current_gpa().await.unwrap();
        assert_eq!(format_gpa(summary.gpa()), "3.50");
    }

    #[tokio::test]
    async fn test_enrolled_courses_logged() {
        let (storage, service, _dir) = setup().await;
        let records = service.enrolled_courses().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.credits == Some(3)));

        let logs = storage.list_logs(LogFilter::All).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].log.operation_type, "student_view");
    }

    #[tokio::test]
    async fn test_what_if_logs_analysis() {
        let (storage, service, _dir) = setup().await;
        let projection = service
            .what_if_impact(&[HypotheticalCourse::new(3, Grade::A).unwrap()])
            .await
            .unwrap();
        assert!((projection.projected_gpa - 33.0 / 9.0).abs() < 1e-9);

        let target = service.what_if_target(3.75).await.unwrap();
        // (3.75*6 - 21) / 0.25 = 6 credits = 2 courses
        assert_eq!(target.courses_needed, 2.0);

        assert!(service.what_if_target(3.5).await.is_err());
        assert!(service.what_if_target(4.5).await.is_err());

        let logs = storage
            .list_logs(LogFilter::KindPrefix("student_analysis".to_string()))
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);
    }

    #[tokio::test]
    async fn test_personal_info() {
        let (_storage, service, _dir) = setup().await;
        let student = service.personal_info().await.unwrap();
        assert_eq!(student.major.as_deref(), Some("Computer Science"));
    }
}
