//! 人员档案存储实现

use super::SeaOrmStorage;
use super::users::insert_user;
use crate::entity::prelude::{Advisors, Instructors, Staff, Students, Users};
use crate::entity::{advisors, instructors, staff, students, users};
use crate::errors::{AcademicError, Result};
use crate::models::{
    people::{
        entities::{Advisor, Instructor, StaffMember, Student},
        requests::{ProfileDetails, UpdateInstructorRequest, UpdateStudentRequest, UpsertPersonRequest},
        responses::PersonSaved,
    },
    users::requests::CreateUserRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 档案存在则更新，否则插入
macro_rules! save_profile {
    ($conn:expr, $entity:ty, $active:expr, $user_id:expr) => {{
        let exists = <$entity>::find_by_id($user_id)
            .one($conn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query profile: {e}")))?
            .is_some();
        let active = $active;
        let saved = if exists {
            active.update($conn).await.map(|_| ())
        } else {
            active.insert($conn).await.map(|_| ())
        };
        saved.map_err(|e| AcademicError::database_operation(format!("Failed to save profile: {e}")))?;
    }};
}

impl SeaOrmStorage {
    /// 创建或更新人员档案
    pub async fn upsert_person_impl(&self, req: UpsertPersonRequest) -> Result<PersonSaved> {
        let role = req.details.role();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to begin transaction: {e}")))?;

        let existing = Users::find()
            .filter(users::Column::Username.eq(&req.person_id))
            .one(&txn)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query user: {e}")))?;

        let (user_id, created_user) = match existing {
            Some(user) if user.role != role.to_string() => {
                return Err(AcademicError::conflict(format!(
                    "User {} already exists with role {}",
                    req.person_id, user.role
                )));
            }
            Some(user) => (user.id, false),
            None => {
                let model = insert_user(
                    &txn,
                    CreateUserRequest {
                        username: req.person_id.clone(),
                        password: req.password_hash,
                        role,
                        role_description: None,
                    },
                )
                .await?;
                (model.id, true)
            }
        };

        match req.details {
            ProfileDetails::Student { gender, major } => {
                save_profile!(
                    &txn,
                    Students,
                    students::ActiveModel {
                        user_id: Set(user_id),
                        student_id: Set(req.person_id),
                        gender: Set(gender),
                        major: Set(major),
                    },
                    user_id
                );
            }
            ProfileDetails::Instructor {
                phone,
                department_id,
                hired_semester,
            } => {
                save_profile!(
                    &txn,
                    Instructors,
                    instructors::ActiveModel {
                        user_id: Set(user_id),
                        instructor_id: Set(req.person_id),
                        phone: Set(phone),
                        department_id: Set(department_id),
                        hired_semester: Set(hired_semester),
                    },
                    user_id
                );
            }
            ProfileDetails::Advisor { phone } => {
                save_profile!(
                    &txn,
                    Advisors,
                    advisors::ActiveModel {
                        user_id: Set(user_id),
                        advisor_id: Set(req.person_id),
                        phone: Set(phone),
                    },
                    user_id
                );
            }
            ProfileDetails::Staff {
                department_id,
                phone,
            } => {
                save_profile!(
                    &txn,
                    Staff,
                    staff::ActiveModel {
                        user_id: Set(user_id),
                        staff_id: Set(req.person_id),
                        department_id: Set(department_id),
                        phone: Set(phone),
                    },
                    user_id
                );
            }
        }

        txn.commit()
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to commit transaction: {e}")))?;

        Ok(PersonSaved {
            user_id,
            created_user,
        })
    }

    pub async fn get_student_impl(&self, student_id: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(students::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query student: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query student: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_instructor_impl(&self, instructor_id: &str) -> Result<Option<Instructor>> {
        let result = Instructors::find()
            .filter(instructors::Column::InstructorId.eq(instructor_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query instructor: {e}")))?;

        Ok(result.map(|m| m.into_instructor()))
    }

    pub async fn get_instructor_by_user_id_impl(
        &self,
        user_id: i64,
    ) -> Result<Option<Instructor>> {
        let result = Instructors::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query instructor: {e}")))?;

        Ok(result.map(|m| m.into_instructor()))
    }

    pub async fn get_advisor_by_user_id_impl(&self, user_id: i64) -> Result<Option<Advisor>> {
        let result = Advisors::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query advisor: {e}")))?;

        Ok(result.map(|m| m.into_advisor()))
    }

    pub async fn get_staff_by_user_id_impl(&self, user_id: i64) -> Result<Option<StaffMember>> {
        let result = Staff::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query staff: {e}")))?;

        Ok(result.map(|m| m.into_staff()))
    }

    /// 主修给定专业的学生，按学号排序
    pub async fn list_students_by_majors_impl(&self, majors: &[String]) -> Result<Vec<Student>> {
        if majors.is_empty() {
            return Ok(Vec::new());
        }

        let result = Students::find()
            .filter(students::Column::Major.is_in(majors.iter().cloned()))
            .order_by_asc(students::Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to list students: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn list_instructors_by_department_impl(
        &self,
        department_id: &str,
    ) -> Result<Vec<Instructor>> {
        let result = Instructors::find()
            .filter(instructors::Column::DepartmentId.eq(department_id))
            .order_by_asc(instructors::Column::InstructorId)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to list instructors: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_instructor()).collect())
    }

    /// 更新学生性别与专业
    pub async fn update_student_impl(
        &self,
        student_id: &str,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let Some(model) = Students::find()
            .filter(students::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query student: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: students::ActiveModel = model.into();
        if let Some(gender) = update.gender {
            active.gender = Set(Some(gender));
        }
        if let Some(major) = update.major {
            active.major = Set(Some(major));
        }

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to update student: {e}")))?;

        Ok(Some(updated.into_student()))
    }

    /// 更新教师电话与入职学期
    pub async fn update_instructor_impl(
        &self,
        instructor_id: &str,
        update: UpdateInstructorRequest,
    ) -> Result<Option<Instructor>> {
        let Some(model) = Instructors::find()
            .filter(instructors::Column::InstructorId.eq(instructor_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query instructor: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: instructors::ActiveModel = model.into();
        if let Some(phone) = update.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(hired) = update.hired_semester {
            active.hired_semester = Set(Some(hired));
        }

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to update instructor: {e}")))?;

        Ok(Some(updated.into_instructor()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::temp_storage;
    use crate::models::people::requests::{
        ProfileDetails, UpdateStudentRequest, UpsertPersonRequest,
    };
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;

    fn student(id: &str, major: &str) -> UpsertPersonRequest {
        UpsertPersonRequest {
            person_id: id.to_string(),
            password_hash: "hash".to_string(),
            details: ProfileDetails::Student {
                gender: Some("F".to_string()),
                major: Some(major.to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_user_and_profile() {
        let (storage, _dir) = temp_storage().await;
        let saved = storage.upsert_person(student("S1001", "CS")).await.unwrap();
        assert!(saved.created_user);

        let user = storage.get_user_by_id(saved.user_id).await.unwrap().unwrap();
        assert_eq!(user.username, "S1001");
        assert_eq!(user.role, UserRole::Student);

        let profile = storage.get_student("S1001").await.unwrap().unwrap();
        assert_eq!(profile.user_id, saved.user_id);
        assert_eq!(profile.major.as_deref(), Some("CS"));
    }

    #[tokio::test]
    async fn test_upsert_reuses_existing_user() {
        let (storage, _dir) = temp_storage().await;
        let first = storage.upsert_person(student("S1001", "CS")).await.unwrap();
        let second = storage.upsert_person(student("S1001", "MATH")).await.unwrap();
        assert_eq!(first.user_id, second.user_id);
        assert!(!second.created_user);

        let profile = storage.get_student("S1001").await.unwrap().unwrap();
        assert_eq!(profile.major.as_deref(), Some("MATH"));
    }

    #[tokio::test]
    async fn test_upsert_rejects_role_mismatch() {
        let (storage, _dir) = temp_storage().await;
        storage.upsert_person(student("X1", "CS")).await.unwrap();
        let err = storage
            .upsert_person(UpsertPersonRequest {
                person_id: "X1".to_string(),
                password_hash: "hash".to_string(),
                details: ProfileDetails::Advisor { phone: None },
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(storage.get_advisor_by_user_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_students_by_majors_and_update() {
        let (storage, _dir) = temp_storage().await;
        storage.upsert_person(student("S1", "CS")).await.unwrap();
        storage.upsert_person(student("S2", "BIO")).await.unwrap();

        let cs = storage
            .list_students_by_majors(&["CS".to_string()])
            .await
            .unwrap();
        assert_eq!(cs.len(), 1);
        assert!(storage.list_students_by_majors(&[]).await.unwrap().is_empty());

        let updated = storage
            .update_student(
                "S2",
                UpdateStudentRequest {
                    gender: None,
                    major: Some("CS".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.gender.as_deref(), Some("F"));
        assert_eq!(updated.major.as_deref(), Some("CS"));
        assert!(storage.update_student("S9", UpdateStudentRequest::default()).await.unwrap().is_none());
    }
}
