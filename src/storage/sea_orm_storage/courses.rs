//! 课程存储实现

use super::SeaOrmStorage;
use crate::entity::prelude::{Courses, InstructorCourses, StudentCourses};
use crate::entity::{courses, instructor_courses, student_courses};
use crate::errors::{AcademicError, Result};
use crate::models::courses::{
    entities::Course,
    requests::{CreateCourseRequest, UpdateCourseRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 按前缀与课程号查找课程，可在事务中调用
pub(super) async fn find_course<C: ConnectionTrait>(
    conn: &C,
    prefix: &str,
    number: &str,
) -> Result<Option<courses::Model>> {
    Courses::find()
        .filter(courses::Column::CoursePrefix.eq(prefix))
        .filter(courses::Column::CourseNumber.eq(number))
        .one(conn)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to query course: {e}")))
}

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        if find_course(&self.db, &req.course_prefix, &req.course_number)
            .await?
            .is_some()
        {
            return Err(AcademicError::conflict(format!(
                "Course already exists: {} {}",
                req.course_prefix, req.course_number
            )));
        }

        let model = courses::ActiveModel {
            course_prefix: Set(req.course_prefix),
            course_number: Set(req.course_number),
            credits: Set(req.credits),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to create course: {e}")))?;

        Ok(model.into_course())
    }

    /// 课程不存在时创建
    pub async fn ensure_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        match find_course(&self.db, &req.course_prefix, &req.course_number).await? {
            Some(model) => Ok(model.into_course()),
            None => self.create_course_impl(req).await,
        }
    }

    pub async fn get_course_impl(&self, prefix: &str, number: &str) -> Result<Option<Course>> {
        Ok(find_course(&self.db, prefix, number)
            .await?
            .map(|m| m.into_course()))
    }

    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_by_prefix_impl(&self, prefix: &str) -> Result<Vec<Course>> {
        let result = Courses::find()
            .filter(courses::Column::CoursePrefix.eq(prefix))
            .order_by_asc(courses::Column::CourseNumber)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to list courses: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    /// 更新课程号与学分
    ///
    /// 课程号变更时在同一事务内同步开课与选课记录。
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let Some(model) = Courses::find_by_id(course_id)
            .one(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course: {e}")))?
        else {
            return Ok(None);
        };

        let prefix = model.course_prefix.clone();
        let old_number = model.course_number.clone();
        let mut active: courses::ActiveModel = model.into();

        if let Some(new_number) = update.course_number.filter(|n| *n != old_number) {
            if find_course(&txn, &prefix, &new_number).await?.is_some() {
                return Err(AcademicError::conflict(format!(
                    "Course already exists: {prefix} {new_number}"
                )));
            }

            InstructorCourses::update_many()
                .col_expr(
                    instructor_courses::Column::CourseNumber,
                    Expr::value(new_number.clone()),
                )
                .filter(instructor_courses::Column::CoursePrefix.eq(&prefix))
                .filter(instructor_courses::Column::CourseNumber.eq(&old_number))
                .exec(&txn)
                .await
                .map_err(|e| AcademicError::database_operation(format!("Failed to update course sections: {e}")))?;

            StudentCourses::update_many()
                .col_expr(
                    student_courses::Column::CourseNumber,
                    Expr::value(new_number.clone()),
                )
                .filter(student_courses::Column::CoursePrefix.eq(&prefix))
                .filter(student_courses::Column::CourseNumber.eq(&old_number))
                .exec(&txn)
                .await
                .map_err(|e| AcademicError::database_operation(format!("Failed to update enrollments: {e}")))?;

            active.course_number = Set(new_number);
        }

        if let Some(credits) = update.credits {
            active.credits = Set(credits);
        }

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to update course: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to commit transaction: {e}")))?;

        Ok(Some(updated.into_course()))
    }

    /// 删除课程，仍被引用时拒绝
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let Some(model) = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query course: {e}")))?
        else {
            return Ok(false);
        };

        let sections = InstructorCourses::find()
            .filter(instructor_courses::Column::CoursePrefix.eq(&model.course_prefix))
            .filter(instructor_courses::Column::CourseNumber.eq(&model.course_number))
            .count(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to count course sections: {e}")))?;
        let enrollments = StudentCourses::find()
            .filter(student_courses::Column::CoursePrefix.eq(&model.course_prefix))
            .filter(student_courses::Column::CourseNumber.eq(&model.course_number))
            .count(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to count enrollments: {e}")))?;

        if sections > 0 || enrollments > 0 {
            return Err(AcademicError::conflict(format!(
                "Course {} {} still has {} sections and {} enrollments",
                model.course_prefix, model.course_number, sections, enrollments
            )));
        }

        model
            .delete(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to delete course: {e}")))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::temp_storage;
    use crate::models::academics::{Semester, Term};
    use crate::models::courses::requests::{CreateCourseRequest, UpdateCourseRequest};
    use crate::storage::Storage;

    fn course(prefix: &str, number: &str, credits: i32) -> CreateCourseRequest {
        CreateCourseRequest {
            course_prefix: prefix.to_string(),
            course_number: number.to_string(),
            credits,
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_and_ensure() {
        let (storage, _dir) = temp_storage().await;
        let created = storage.create_course(course("CS", "101", 3)).await.unwrap();
        assert_eq!(created.code(), "CS 101");

        let err = storage.create_course(course("CS", "101", 4)).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        assert_eq!(err.message(), "Course already exists: CS 101");

        let ensured = storage.ensure_course(course("CS", "101", 4)).await.unwrap();
        assert_eq!(ensured.course_id, created.course_id);
        assert_eq!(ensured.credits, 3);

        storage.create_course(course("CS", "201", 3)).await.unwrap();
        storage.create_course(course("MATH", "101", 4)).await.unwrap();
        assert_eq!(storage.list_courses_by_prefix("CS").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_course_renumbers_references() {
        let (storage, _dir) = temp_storage().await;
        let created = storage.create_course(course("CS", "101", 3)).await.unwrap();
        storage.create_course(course("CS", "102", 3)).await.unwrap();
        let term = Term::new(Semester::Fall, 2024);
        storage
            .create_section("CS", "101", term, Some("I1"))
            .await
            .unwrap();

        let err = storage
            .update_course(
                created.course_id,
                UpdateCourseRequest {
                    course_number: Some("102".to_string()),
                    credits: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");

        let updated = storage
            .update_course(
                created.course_id,
                UpdateCourseRequest {
                    course_number: Some("110".to_string()),
                    credits: Some(4),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.course_number, "110");
        assert_eq!(updated.credits, 4);

        let sections = storage.list_sections_by_instructor("I1").await.unwrap();
        assert_eq!(sections[0].section.course_number, "110");
        assert_eq!(sections[0].credits, Some(4));
    }

    #[tokio::test]
    async fn test_delete_course_refuses_referenced() {
        let (storage, _dir) = temp_storage().await;
        let free = storage.create_course(course("CS", "101", 3)).await.unwrap();
        let used = storage.create_course(course("CS", "201", 3)).await.unwrap();
        storage
            .create_section("CS", "201", Term::new(Semester::Spring, 2025), None)
            .await
            .unwrap();

        assert!(storage.delete_course(free.course_id).await.unwrap());
        assert!(!storage.delete_course(free.course_id).await.unwrap());
        assert_eq!(
            storage.delete_course(used.course_id).await.unwrap_err().code(),
            "E007"
        );
    }
}
