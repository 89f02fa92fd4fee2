//! 开课记录存储实现

use super::SeaOrmStorage;
use super::courses::find_course;
use crate::entity::instructor_courses::{ActiveModel, Column, Model};
use crate::entity::prelude::{InstructorCourses, Instructors, StudentCourses};
use crate::entity::{instructors, student_courses};
use crate::errors::{AcademicError, Result};
use crate::models::{
    academics::Term,
    courses::{entities::CourseSection, requests::ScheduleSectionRequest, responses::SectionDetail},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};

/// 教师某学期已承担的学分
pub(super) async fn term_load<C: ConnectionTrait>(
    conn: &C,
    instructor_id: &str,
    term: Term,
) -> Result<i32> {
    let sections = InstructorCourses::find()
        .filter(Column::InstructorId.eq(instructor_id))
        .filter(Column::Semester.eq(term.semester.code()))
        .filter(Column::YearTaught.eq(term.year))
        .all(conn)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to query course sections: {e}")))?;

    let mut total = 0;
    for section in sections {
        if let Some(course) = find_course(conn, &section.course_prefix, &section.course_number).await? {
            total += course.credits;
        }
    }
    Ok(total)
}

/// 加入新课程后是否超过学分上限
fn check_load(
    instructor_id: &str,
    term: Term,
    current: i32,
    added: i32,
    max_credits: i32,
) -> Result<()> {
    if current + added > max_credits {
        return Err(AcademicError::validation(format!(
            "Instructor {instructor_id} already teaches {current} credits in {term}; adding {added} would exceed the limit of {max_credits}"
        )));
    }
    Ok(())
}

async fn ensure_instructor_exists<C: ConnectionTrait>(conn: &C, instructor_id: &str) -> Result<()> {
    let found = Instructors::find()
        .filter(instructors::Column::InstructorId.eq(instructor_id))
        .one(conn)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to query instructor: {e}")))?;
    if found.is_none() {
        return Err(AcademicError::not_found(format!("Instructor not found: {instructor_id}")));
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 直接写入开课记录
    pub async fn create_section_impl(
        &self,
        prefix: &str,
        number: &str,
        term: Term,
        instructor_id: Option<&str>,
    ) -> Result<CourseSection> {
        let model = ActiveModel {
            instructor_id: Set(instructor_id.map(str::to_string)),
            course_prefix: Set(prefix.to_string()),
            course_number: Set(number.to_string()),
            semester: Set(term.semester.code().to_string()),
            year_taught: Set(term.year),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to create course section: {e}")))?;

        Ok(model.into_section())
    }

    /// 排课
    pub async fn schedule_section_impl(
        &self,
        req: ScheduleSectionRequest,
        max_instructor_credits: i32,
    ) -> Result<CourseSection> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let course = find_course(&txn, &req.course_prefix, &req.course_number)
            .await?
            .ok_or_else(|| {
                AcademicError::not_found(format!(
                    "Course not found: {} {}",
                    req.course_prefix, req.course_number
                ))
            })?;

        let duplicates = InstructorCourses::find()
            .filter(Column::CoursePrefix.eq(&req.course_prefix))
            .filter(Column::CourseNumber.eq(&req.course_number))
            .filter(Column::Semester.eq(req.term.semester.code()))
            .filter(Column::YearTaught.eq(req.term.year))
            .count(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course sections: {e}")))?;
        if duplicates > 0 {
            return Err(AcademicError::conflict(format!(
                "{} is already offered in {}",
                course.course_prefix, req.term
            )));
        }

        if let Some(instructor_id) = req.instructor_id.as_deref() {
            ensure_instructor_exists(&txn, instructor_id).await?;
            let current = term_load(&txn, instructor_id, req.term).await?;
            check_load(
                instructor_id,
                req.term,
                current,
                course.credits,
                max_instructor_credits,
            )?;
        }

        let model = ActiveModel {
            instructor_id: Set(req.instructor_id),
            course_prefix: Set(req.course_prefix),
            course_number: Set(req.course_number),
            semester: Set(req.term.semester.code().to_string()),
            year_taught: Set(req.term.year),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to create course section: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to commit transaction: {e}")))?;

        Ok(model.into_section())
    }

    /// 为待定开课指定教师
    pub async fn assign_instructor_impl(
        &self,
        section_id: i64,
        instructor_id: &str,
        max_instructor_credits: i32,
    ) -> Result<CourseSection> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let section = InstructorCourses::find_by_id(section_id)
            .one(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course sections: {e}")))?
            .ok_or_else(|| AcademicError::not_found(format!("Section not found: {section_id}")))?;

        if let Some(existing) = &section.instructor_id {
            return Err(AcademicError::conflict(format!(
                "Section {section_id} is already assigned to {existing}"
            )));
        }

        let term = Term::from_parts(&section.semester, section.year_taught).ok_or_else(|| {
            AcademicError::validation(format!("Section has an invalid semester: {}", section.semester))
        })?;

        ensure_instructor_exists(&txn, instructor_id).await?;
        let credits = find_course(&txn, &section.course_prefix, &section.course_number)
            .await?
            .map(|c| c.credits)
            .unwrap_or(0);
        let current = term_load(&txn, instructor_id, term).await?;
        check_load(instructor_id, term, current, credits, max_instructor_credits)?;

        let mut active: ActiveModel = section.into();
        active.instructor_id = Set(Some(instructor_id.to_string()));
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to update course section: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to commit transaction: {e}")))?;

        Ok(updated.into_section())
    }

    pub async fn get_section_impl(&self, section_id: i64) -> Result<Option<CourseSection>> {
        let result = InstructorCourses::find_by_id(section_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course sections: {e}")))?;

        Ok(result.map(|m| m.into_section()))
    }

    pub async fn list_sections_by_instructor_impl(
        &self,
        instructor_id: &str,
    ) -> Result<Vec<SectionDetail>> {
        let models = InstructorCourses::find()
            .filter(Column::InstructorId.eq(instructor_id))
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course sections: {e}")))?;

        self.section_details(models).await
    }

    pub async fn list_sections_by_prefix_impl(&self, prefix: &str) -> Result<Vec<SectionDetail>> {
        let models = InstructorCourses::find()
            .filter(Column::CoursePrefix.eq(prefix))
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course sections: {e}")))?;

        self.section_details(models).await
    }

    pub async fn instructor_term_credits_impl(&self, instructor_id: &str, term: Term) -> Result<i32> {
        term_load(&self.db, instructor_id, term).await
    }

    /// 补充学分与选课人数，按学期倒序排列
    async fn section_details(&self, models: Vec<Model>) -> Result<Vec<SectionDetail>> {
        let mut details = Vec::with_capacity(models.len());
        for model in models {
            let credits = find_course(&self.db, &model.course_prefix, &model.course_number)
                .await?
                .map(|c| c.credits);
            let enrolled = StudentCourses::find()
                .filter(student_courses::Column::CoursePrefix.eq(&model.course_prefix))
                .filter(student_courses::Column::CourseNumber.eq(&model.course_number))
                .filter(student_courses::Column::Semester.eq(&model.semester))
                .filter(student_courses::Column::YearTaken.eq(model.year_taught))
                .count(&self.db)
                .await
                .map_err(|e| AcademicError::database_operation(format!("Failed to count enrolled credits: {e}")))?;

            details.push(SectionDetail {
                section: model.into_section(),
                credits,
                enrolled,
            });
        }

        details.sort_by(|a, b| {
            b.section
                .term()
                .cmp(&a.section.term())
                .then_with(|| b.section.year.cmp(&a.section.year))
                .then_with(|| a.section.code().cmp(&b.section.code()))
        });
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::temp_storage;
    use crate::models::academics::{Semester, Term};
    use crate::models::courses::requests::{CreateCourseRequest, ScheduleSectionRequest};
    use crate::models::people::requests::{ProfileDetails, UpsertPersonRequest};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn seed(storage: &SeaOrmStorage) {
        for (number, credits) in [("101", 4), ("201", 4), ("301", 4), ("401", 3)] {
            storage
                .create_course(CreateCourseRequest {
                    course_prefix: "CS".to_string(),
                    course_number: number.to_string(),
                    credits,
                })
                .await
                .unwrap();
        }
        storage
            .upsert_person(UpsertPersonRequest {
                person_id: "I1".to_string(),
                password_hash: "hash".to_string(),
                details: ProfileDetails::Instructor {
                    phone: None,
                    department_id: Some("CS".to_string()),
                    hired_semester: None,
                },
            })
            .await
            .unwrap();
    }

    fn schedule(number: &str, term: Term, instructor: Option<&str>) -> ScheduleSectionRequest {
        ScheduleSectionRequest {
            course_prefix: "CS".to_string(),
            course_number: number.to_string(),
            term,
            instructor_id: instructor.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_schedule_enforces_duplicates_and_load() {
        let (storage, _dir) = temp_storage().await;
        seed(&storage).await;
        let term = Term::new(Semester::Fall, 2030);

        storage
            .schedule_section(schedule("101", term, Some("I1")), 12)
            .await
            .unwrap();
        let dup = storage
            .schedule_section(schedule("101", term, None), 12)
            .await
            .unwrap_err();
        assert_eq!(dup.code(), "E007");

        storage
            .schedule_section(schedule("201", term, Some("I1")), 12)
            .await
            .unwrap();
        storage
            .schedule_section(schedule("301", term, Some("I1")), 12)
            .await
            .unwrap();
        assert_eq!(storage.instructor_term_credits("I1", term).await.unwrap(), 12);

        let over = storage
            .schedule_section(schedule("401", term, Some("I1")), 12)
            .await
            .unwrap_err();
        assert_eq!(over.code(), "E005");

        // 另一个学期不受影响
        storage
            .schedule_section(schedule("401", Term::new(Semester::Spring, 2031), Some("I1")), 12)
            .await
            .unwrap();

        let missing = storage
            .schedule_section(schedule("999", term, None), 12)
            .await
            .unwrap_err();
        assert_eq!(missing.code(), "E006");
    }

    #[tokio::test]
    async fn test_assign_instructor_to_tba_section() {
        let (storage, _dir) = temp_storage().await;
        seed(&storage).await;
        let term = Term::new(Semester::Spring, 2030);

        let tba = storage
            .schedule_section(schedule("101", term, None), 12)
            .await
            .unwrap();
        assert_eq!(tba.instructor_label(), "TBA");

        let assigned = storage.assign_instructor(tba.id, "I1", 12).await.unwrap();
        assert_eq!(assigned.instructor_id.as_deref(), Some("I1"));

        let again = storage.assign_instructor(tba.id, "I1", 12).await.unwrap_err();
        assert_eq!(again.code(), "E007");

        let other = storage
            .schedule_section(schedule("201", term, None), 12)
            .await
            .unwrap();
        let unknown = storage.assign_instructor(other.id, "NOPE", 12).await.unwrap_err();
        assert_eq!(unknown.code(), "E006");
        let over = storage.assign_instructor(other.id, "I1", 6).await.unwrap_err();
        assert_eq!(over.code(), "E005");
    }

    #[tokio::test]
    async fn test_sections_ordered_newest_first() {
        let (storage, _dir) = temp_storage().await;
        seed(&storage).await;
        storage
            .create_section("CS", "101", Term::new(Semester::Fall, 2024), Some("I1"))
            .await
            .unwrap();
        storage
            .create_section("CS", "201", Term::new(Semester::Spring, 2025), Some("I1"))
            .await
            .unwrap();
        storage
            .create_section("CS", "301", Term::new(Semester::Summer, 2024), Some("I1"))
            .await
            .unwrap();

        let sections = storage.list_sections_by_instructor("I1").await.unwrap();
        let terms: Vec<_> = sections.iter().filter_map(|s| s.section.term()).collect();
        assert_eq!(
            terms,
            vec![
                Term::new(Semester::Spring, 2025),
                Term::new(Semester::Fall, 2024),
                Term::new(Semester::Summer, 2024),
            ]
        );
        assert_eq!(sections[0].enrolled, 0);
        assert_eq!(sections[0].credits, Some(4));
    }
}
