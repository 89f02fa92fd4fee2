//! 选课记录存储实现

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{Courses, InstructorCourses, StudentCourses, Students};
use crate::entity::student_courses::{ActiveModel, Column, Model};
use crate::entity::{courses, students};
use crate::errors::{AcademicError, Result};
use crate::models::{
    academics::{Grade, Term},
    courses::{
        entities::Enrollment,
        requests::RegisterRequest,
        responses::{EnrollmentRecord, RosterEntry},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 直接写入选课记录，空成绩按未评分处理
    pub async fn create_enrollment_impl(
        &self,
        student_id: &str,
        prefix: &str,
        number: &str,
        term: Term,
        grade: Option<String>,
    ) -> Result<Enrollment> {
        let grade = grade
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        let model = ActiveModel {
            student_id: Set(student_id.to_string()),
            course_prefix: Set(prefix.to_string()),
            course_number: Set(number.to_string()),
            semester: Set(term.semester.code().to_string()),
            year_taken: Set(term.year),
            grade: Set(grade),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to create enrollment: {e}")))?;

        Ok(model.into_enrollment())
    }

    pub async fn list_enrollment_records_impl(
        &self,
        student_id: &str,
    ) -> Result<Vec<EnrollmentRecord>> {
        let models = StudentCourses::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::YearTaken)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query enrollments: {e}")))?;

        self.with_credits(models).await
    }

    pub async fn list_enrollment_records_for_students_impl(
        &self,
        student_ids: &[String],
    ) -> Result<Vec<EnrollmentRecord>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = StudentCourses::find()
            .filter(Column::StudentId.is_in(student_ids.iter().cloned()))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query enrollments: {e}")))?;

        self.with_credits(models).await
    }

    /// 注册选课
    pub async fn register_enrollment_impl(&self, req: RegisterRequest) -> Result<Enrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let student = Students::find()
            .filter(students::Column::StudentId.eq(&req.student_id))
            .one(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query student: {e}")))?;
        if student.is_none() {
            return Err(AcademicError::not_found(format!(
                "Student not found: {}",
                req.student_id
            )));
        }

        let course = Courses::find()
            .filter(courses::Column::CoursePrefix.eq(&req.course_prefix))
            .filter(courses::Column::CourseNumber.eq(&req.course_number))
            .one(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course: {e}")))?;
        if course.is_none() {
            return Err(AcademicError::not_found(format!(
                "Course not found: {} {}",
                req.course_prefix, req.course_number
            )));
        }

        let duplicate = StudentCourses::find()
            .filter(Column::StudentId.eq(&req.student_id))
            .filter(Column::CoursePrefix.eq(&req.course_prefix))
            .filter(Column::CourseNumber.eq(&req.course_number))
            .filter(Column::Semester.eq(req.term.semester.code()))
            .filter(Column::YearTaken.eq(req.term.year))
            .one(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query enrollments: {e}")))?;
        if duplicate.is_some() {
            return Err(AcademicError::conflict(format!(
                "Student {} is already enrolled in {} for {} {}",
                req.student_id, req.term, req.course_prefix, req.course_number
            )));
        }

        let model = ActiveModel {
            student_id: Set(req.student_id),
            course_prefix: Set(req.course_prefix),
            course_number: Set(req.course_number),
            semester: Set(req.term.semester.code().to_string()),
            year_taken: Set(req.term.year),
            grade: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to create enrollment: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to commit transaction: {e}")))?;

        Ok(model.into_enrollment())
    }

    /// 退课，已评分的记录不可删除
    pub async fn drop_enrollment_impl(
        &self,
        student_id: &str,
        prefix: &str,
        number: &str,
        term: Term,
    ) -> Result<Enrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let model = StudentCourses::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CoursePrefix.eq(prefix))
            .filter(Column::CourseNumber.eq(number))
            .filter(Column::Semester.eq(term.semester.code()))
            .filter(Column::YearTaken.eq(term.year))
            .one(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query enrollments: {e}")))?
            .ok_or_else(|| {
                AcademicError::not_found(format!(
                    "Enrollment not found: {student_id} {prefix} {number} ({term})"
                ))
            })?;

        let enrollment = model.clone().into_enrollment();
        if enrollment.is_graded() {
            return Err(AcademicError::validation(format!(
                "{prefix} {number} ({term}) is already graded and cannot be dropped"
            )));
        }

        model
            .delete(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to delete enrollment: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to commit transaction: {e}")))?;

        Ok(enrollment)
    }

    pub async fn get_enrollment_impl(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        let result = StudentCourses::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query enrollments: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 开课名单，按学号排序
    pub async fn list_roster_impl(&self, section_id: i64) -> Result<Vec<RosterEntry>> {
        let section = InstructorCourses::find_by_id(section_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course sections: {e}")))?
            .ok_or_else(|| AcademicError::not_found(format!("Section not found: {section_id}")))?;

        let models = StudentCourses::find()
            .filter(Column::CoursePrefix.eq(&section.course_prefix))
            .filter(Column::CourseNumber.eq(&section.course_number))
            .filter(Column::Semester.eq(&section.semester))
            .filter(Column::YearTaken.eq(section.year_taught))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query enrollments: {e}")))?;

        let mut roster = Vec::with_capacity(models.len());
        for model in models {
            let profile = Students::find()
                .filter(students::Column::StudentId.eq(&model.student_id))
                .one(&self.db)
                .await
                .map_err(|e| AcademicError::database_operation(format!("Failed to query student: {e}")))?;
            let (gender, major) = profile
                .map(|p| (p.gender, p.major))
                .unwrap_or((None, None));

            roster.push(RosterEntry {
                enrollment_id: model.id,
                student_id: model.student_id,
                gender,
                major,
                grade: model.grade,
            });
        }

        Ok(roster)
    }

    /// 记录成绩，None 表示清除成绩
    pub async fn set_grade_impl(
        &self,
        enrollment_id: i64,
        grade: Option<Grade>,
    ) -> Result<Option<Enrollment>> {
        let Some(model) = StudentCourses::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query enrollments: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();
        active.grade = Set(grade.map(|g| g.to_string()));
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to update grade: {e}")))?;

        Ok(Some(updated.into_enrollment()))
    }

    /// 补充课程学分并按学期倒序排列
    async fn with_credits(&self, models: Vec<Model>) -> Result<Vec<EnrollmentRecord>> {
        let mut credits: HashMap<(String, String), Option<i32>> = HashMap::new();
        let mut records = Vec::with_capacity(models.len());

        for model in models {
            let key = (model.course_prefix.clone(), model.course_number.clone());
            let course_credits = match credits.get(&key).copied() {
                Some(cached) => cached,
                None => {
                    let found = Courses::find()
                        .filter(courses::Column::CoursePrefix.eq(&key.0))
                        .filter(courses::Column::CourseNumber.eq(&key.1))
                        .one(&self.db)
                        .await
                        .map_err(|e| {
                            AcademicError::database_operation(format!("Failed to query course: {e}"))
                        })?
                        .map(|c| c.credits);
                    credits.insert(key, found);
                    found
                }
            };

            records.push(EnrollmentRecord {
                enrollment: model.into_enrollment(),
                credits: course_credits,
            });
        }

        records.sort_by(|a, b| {
            a.enrollment
                .student_id
                .cmp(&b.enrollment.student_id)
                .then_with(|| b.enrollment.term().cmp(&a.enrollment.term()))
                .then_with(|| a.enrollment.code().cmp(&b.enrollment.code()))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::temp_storage;
    use crate::models::academics::{Grade, Semester, Term};
    use crate::models::courses::requests::{CreateCourseRequest, RegisterRequest};
    use crate::models::people::requests::{ProfileDetails, UpsertPersonRequest};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn seed(storage: &SeaOrmStorage) {
        storage
            .upsert_person(UpsertPersonRequest {
                person_id: "S1".to_string(),
                password_hash: "hash".to_string(),
                details: ProfileDetails::Student {
                    gender: Some("M".to_string()),
                    major: Some("CS".to_string()),
                },
            })
            .await
            .unwrap();
        storage
            .create_course(CreateCourseRequest {
                course_prefix: "CS".to_string(),
                course_number: "101".to_string(),
                credits: 3,
            })
            .await
            .unwrap();
    }

    fn register(term: Term) -> RegisterRequest {
        RegisterRequest {
            student_id: "S1".to_string(),
            course_prefix: "CS".to_string(),
            course_number: "101".to_string(),
            term,
        }
    }

    #[tokio::test]
    async fn test_register_checks_duplicates_and_course() {
        let (storage, _dir) = temp_storage().await;
        seed(&storage).await;
        let term = Term::new(Semester::Fall, 2030);

        let enrollment = storage.register_enrollment(register(term)).await.unwrap();
        assert!(enrollment.grade.is_none());

        let dup = storage.register_enrollment(register(term)).await.unwrap_err();
        assert_eq!(dup.code(), "E007");

        let missing = storage
            .register_enrollment(RegisterRequest {
                course_number: "999".to_string(),
                ..register(term)
            })
            .await
            .unwrap_err();
        assert_eq!(missing.code(), "E006");

        let records = storage.list_enrollment_records("S1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].credits, Some(3));
    }

    #[tokio::test]
    async fn test_drop_only_ungraded() {
        let (storage, _dir) = temp_storage().await;
        seed(&storage).await;
        let term = Term::new(Semester::Spring, 2031);
        let graded_term = Term::new(Semester::Fall, 2030);

        storage.register_enrollment(register(term)).await.unwrap();
        let graded = storage.register_enrollment(register(graded_term)).await.unwrap();
        storage.set_grade(graded.id, Some(Grade::A)).await.unwrap();

        let dropped = storage
            .drop_enrollment("S1", "CS", "101", term)
            .await
            .unwrap();
        assert_eq!(dropped.term(), Some(term));

        let err = storage
            .drop_enrollment("S1", "CS", "101", graded_term)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        let gone = storage
            .drop_enrollment("S1", "CS", "101", term)
            .await
            .unwrap_err();
        assert_eq!(gone.code(), "E006");
        assert_eq!(storage.list_enrollment_records("S1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_roster_and_grades() {
        let (storage, _dir) = temp_storage().await;
        seed(&storage).await;
        let term = Term::new(Semester::Fall, 2024);
        let section = storage
            .create_section("CS", "101", term, Some("I1"))
            .await
            .unwrap();
        let enrollment = storage
            .create_enrollment("S1", "CS", "101", term, Some(" ".to_string()))
            .await
            .unwrap();
        assert!(enrollment.grade.is_none());

        let roster = storage.list_roster(section.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].major.as_deref(), Some("CS"));

        let updated = storage
            .set_grade(roster[0].enrollment_id, Some(Grade::B))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.grade.as_deref(), Some("B"));
        assert!(storage.set_grade(9999, None).await.unwrap().is_none());
    }
}
