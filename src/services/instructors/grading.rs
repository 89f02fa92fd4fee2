use serde_json::json;
use tracing::info;

use super::InstructorService;
use super::sections::owned_section;
use crate::errors::{AcademicError, Result};
use crate::models::academics::Grade;
use crate::models::audit::entities::OperationKind;
use crate::models::courses::entities::Enrollment;

pub async fn record_grade(
    service: &InstructorService,
    section_id: i64,
    student_id: &str,
    grade: Option<Grade>,
) -> Result<Enrollment> {
    let section = owned_section(service, section_id).await?;
    let ctx = service.ctx();

    let entry = ctx
        .storage
        .list_roster(section_id)
        .await?
        .into_iter()
        .find(|e| e.student_id == student_id)
        .ok_or_else(|| {
            AcademicError::not_found(format!(
                "Student {student_id} is not enrolled in {}",
                section.code()
            ))
        })?;

    let updated = ctx
        .storage
        .set_grade(entry.enrollment_id, grade)
        .await?
        .ok_or_else(|| {
            AcademicError::not_found(format!("Enrollment {} not found", entry.enrollment_id))
        })?;

    ctx.audit
        .log_data_modification(
            OperationKind::Modify,
            "grade",
            &format!("{student_id} in {}", section.code()),
            Some(json!({ "grade": entry.grade })),
            Some(json!({ "grade": updated.grade })),
        )
        .await?;

    info!(
        "Instructor {} recorded grade {:?} for {} in {}",
        ctx.identity(),
        updated.grade,
        student_id,
        section.code()
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::errors::AcademicError;
    use crate::models::academics::{Grade, Semester, Term};
    use crate::models::audit::requests::LogFilter;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::people::requests::ProfileDetails;
    use crate::services::InstructorService;
    use crate::services::test_support::{context, seed_person};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::temp_storage;

    async fn setup() -> (Arc<dyn Storage>, InstructorService, i64, i64, tempfile::TempDir) {
        let (storage, dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let session = seed_person(
            &storage,
            "I1",
            "pw",
            ProfileDetails::Instructor {
                phone: None,
                department_id: Some("CS".to_string()),
                hired_semester: Some("F2020".to_string()),
            },
        )
        .await;

        storage
            .create_course(CreateCourseRequest {
                course_prefix: "CS".to_string(),
                course_number: "101".to_string(),
                credits: 3,
            })
            .await
            .unwrap();
        let term = Term::new(Semester::Spring, 2025);
        let own = storage
            .create_section("CS", "101", term, Some("I1"))
            .await
            .unwrap();
        let other = storage
            .create_section("CS", "101", Term::new(Semester::Fall, 2025), Some("I2"))
            .await
            .unwrap();
        seed_person(
            &storage,
            "S1",
            "pw",
            ProfileDetails::Student {
                gender: Some("M".to_string()),
                major: None,
            },
        )
        .await;
        storage
            .create_enrollment("S1", "CS", "101", term, None)
            .await
            .unwrap();

        let service = InstructorService::new(context(&storage, session));
        (storage, service, own.id, other.id, dir)
    }

    #[tokio::test]
    async fn test_roster_and_grade() {
        let (storage, service, own, _other, _dir) = setup().await;

        let (section, roster) = service.roster(own).await.unwrap();
        assert_eq!(section.code(), "CS 101");
        assert_eq!(roster.len(), 1);
        assert!(roster[0].grade.is_none());

        let updated = service.record_grade(own, "S1", Some(Grade::B)).await.unwrap();
        assert_eq!(updated.grade.as_deref(), Some("B"));

        let logs = storage
            .list_logs(LogFilter::KindPrefix("instructor_modify".to_string()))
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].log.details.contains("before"));
    }

    #[tokio::test]
    async fn test_other_instructor_section_refused() {
        let (_storage, service, _own, other, _dir) = setup().await;
        assert!(matches!(
            service.roster(other).await,
            Err(AcademicError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_grade_for_unknown_student() {
        let (_storage, service, own, _other, _dir) = setup().await;
        assert!(matches!(
            service.record_grade(own, "S9", Some(Grade::A)).await,
            Err(AcademicError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sections_newest_first() {
        let (storage, service, _own, _other, _dir) = setup().await;
        storage
            .create_section("CS", "101", Term::new(Semester::Fall, 2023), Some("I1"))
            .await
            .unwrap();
        let sections = service.list_sections().await.unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section.year, 2025);
        assert_eq!(sections[0].enrolled, 1);
    }
}
