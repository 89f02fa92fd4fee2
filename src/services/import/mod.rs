//! CSV 数据导入
//!
//! 从目录读取六个 CSV 文件，按人员、院系、开课、选课的顺序写入。
//! 单行失败只记录错误并继续，缺少文件则整体失败。

pub mod academics;
pub mod people;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::errors::{AcademicError, Result};
use crate::models::audit::entities::OperationKind;
use crate::models::users::entities::UserRole;
use crate::services::AuditLogger;
use crate::storage::Storage;
use crate::utils::csv::{CsvRow, read_csv_file};

pub const STUDENTS_FILE: &str = "students.csv";
pub const INSTRUCTORS_FILE: &str = "instructors.csv";
pub const STAFF_FILE: &str = "staff.csv";
pub const DEPARTMENTS_FILE: &str = "Departments.csv";
pub const INSTRUCTOR_COURSES_FILE: &str = "InstructorCourse.csv";
pub const STUDENT_COURSES_FILE: &str = "StudentCourse.csv";

const ALL_FILES: [&str; 6] = [
    STUDENTS_FILE,
    INSTRUCTORS_FILE,
    STAFF_FILE,
    DEPARTMENTS_FILE,
    INSTRUCTOR_COURSES_FILE,
    STUDENT_COURSES_FILE,
];

/// 导入失败的行
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImportRowError {
    pub file: &'static str,
    pub row: usize,
    pub message: String,
}

/// 导入结果统计
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ImportSummary {
    pub students: usize,
    pub instructors: usize,
    pub staff: usize,
    pub departments: usize,
    pub majors: usize,
    pub advisors: usize,
    pub courses: usize,
    pub sections: usize,
    pub enrollments: usize,
    /// 缺少编号列而跳过的行
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportSummary {
    pub(crate) fn record_error(&mut self, file: &'static str, row: usize, error: AcademicError) {
        warn!("Import {} row {}: {}", file, row, error);
        self.errors.push(ImportRowError {
            file,
            row,
            message: error.to_string(),
        });
    }
}

pub struct ImportService {
    storage: Arc<dyn Storage>,
    /// 新建用户使用的默认密码哈希
    password_hash: String,
    /// 导入选课记录时，目录中缺失课程的假定学分
    assumed_course_credits: i32,
}

impl ImportService {
    pub fn new(storage: Arc<dyn Storage>, password_hash: String, assumed_course_credits: u32) -> Self {
        Self {
            storage,
            password_hash,
            assumed_course_credits: i32::try_from(assumed_course_credits).unwrap_or(3),
        }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub(crate) fn assumed_course_credits(&self) -> i32 {
        self.assumed_course_credits
    }

    /// 导入目录中的全部文件
    pub async fn import_dir(&self, dir: &Path) -> Result<ImportSummary> {
        let missing: Vec<&str> = ALL_FILES
            .iter()
            .copied()
            .filter(|f| !dir.join(f).is_file())
            .collect();
        if !missing.is_empty() {
            return Err(AcademicError::import(format!(
                "Missing files in {}: {}",
                dir.display(),
                missing.join(", ")
            )));
        }

        let load = |name: &str| -> Result<Vec<CsvRow>> { read_csv_file(dir.join(name)) };
        let mut summary = ImportSummary::default();

        people::import_students(self, &load(STUDENTS_FILE)?, &mut summary).await?;
        people::import_instructors(self, &load(INSTRUCTORS_FILE)?, &mut summary).await?;
        people::import_staff(self, &load(STAFF_FILE)?, &mut summary).await?;
        people::import_departments(self, &load(DEPARTMENTS_FILE)?, &mut summary).await?;
        academics::import_sections(self, &load(INSTRUCTOR_COURSES_FILE)?, &mut summary).await?;
        academics::import_enrollments(self, &load(STUDENT_COURSES_FILE)?, &mut summary).await?;

        AuditLogger::new(self.storage.clone(), 0, UserRole::Admin)
            .log(
                OperationKind::SystemSetup,
                &format!("Imported data from {}", dir.display()),
                Some(&json!({
                    "students": summary.students,
                    "instructors": summary.instructors,
                    "staff": summary.staff,
                    "departments": summary.departments,
                    "sections": summary.sections,
                    "enrollments": summary.enrollments,
                    "errors": summary.errors.len(),
                })),
            )
            .await?;

        info!(
            "Import finished: {} students, {} instructors, {} staff, {} sections, {} enrollments, {} errors",
            summary.students,
            summary.instructors,
            summary.staff,
            summary.sections,
            summary.enrollments,
            summary.errors.len()
        );
        Ok(summary)
    }
}

/// 表头占第一行
pub(crate) fn row_number(index: usize) -> usize {
    index + 2
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::models::audit::requests::LogFilter;
    use crate::services::AuthService;
    use crate::services::test_support::fast_argon2;
    use crate::storage::sea_orm_storage::test_support::temp_storage;
    use crate::utils::password::hash_password_with;

    fn write_fixture(dir: &Path) {
        let files = [
            (STUDENTS_FILE, "StudentID,Gender,Major\nS1,F,Computer Science\nS2,M,Mathematics\n,M,History\n"),
            (
                INSTRUCTORS_FILE,
                "InstructorID,InstructorPhone,DepartmentID,HiredSemester\nI1,555-0100,CS,F2015\n",
            ),
            (STAFF_FILE, "StaffID,DepartmentID,Phone\nST1,CS,555-0199\n"),
            (
                DEPARTMENTS_FILE,
                "DepartmentID,Building,Office,MajorOffered,TotalHoursReq,AdvisorID,AdvisorPhone\n\
                 CS,Science Hall,101,Computer Science,120,A1,555-0111\n\
                 MATH,Math Hall,5,Mathematics,110,A1,555-0111\n",
            ),
            (
                INSTRUCTOR_COURSES_FILE,
                "InstructorID,CoursePrefix,CourseNumber,Credits,Semester,YearTaught\n\
                 I1,CS,101,3,F,2024\n\
                 I1,CS,201,4,S,2025\n\
                 I1,CS,301,x,S,2025\n",
            ),
            (
                STUDENT_COURSES_FILE,
                "StudentID,CoursePrefix,CourseNumber,Semester,YearTaken,Grade\n\
                 S1,CS,101,F,2024,A\n\
                 S1,CS,201,S,2025,\n\
                 S2,MATH,110,F,2024,B\n",
            ),
        ];
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    #[tokio::test]
    async fn test_import_fixture() {
        let (storage, _db_dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let csv_dir = tempfile::tempdir().unwrap();
        write_fixture(csv_dir.path());

        let hash = hash_password_with("password", &fast_argon2()).unwrap();
        let service = ImportService::new(storage.clone(), hash, 3);
        let summary = service.import_dir(csv_dir.path()).await.unwrap();

        assert_eq!(summary.students, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.instructors, 1);
        assert_eq!(summary.staff, 1);
        assert_eq!(summary.departments, 2);
        assert_eq!(summary.advisors, 1);
        assert_eq!(summary.sections, 2);
        assert_eq!(summary.enrollments, 3);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].file, INSTRUCTOR_COURSES_FILE);
        assert_eq!(summary.errors[0].row, 4);

        assert_eq!(
            storage.list_advisor_departments("A1").await.unwrap(),
            vec!["CS".to_string(), "MATH".to_string()]
        );
        // 缺失课程按假定学分补齐
        let math = storage.get_course("MATH", "110").await.unwrap().unwrap();
        assert_eq!(math.credits, 3);

        let session = AuthService::new(storage.clone())
            .verify("S1", "password")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.role, UserRole::Student);

        let setup = storage
            .list_logs(LogFilter::KindPrefix("system_setup".to_string()))
            .await
            .unwrap();
        assert_eq!(setup.len(), 1);
    }

    #[tokio::test]
    async fn test_import_is_idempotent_for_people() {
        let (storage, _db_dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let csv_dir = tempfile::tempdir().unwrap();
        write_fixture(csv_dir.path());

        let hash = hash_password_with("password", &fast_argon2()).unwrap();
        let service = ImportService::new(storage.clone(), hash, 3);
        service.import_dir(csv_dir.path()).await.unwrap();
        service.import_dir(csv_dir.path()).await.unwrap();

        assert_eq!(storage.count_users_by_role(UserRole::Student).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let (storage, _db_dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let csv_dir = tempfile::tempdir().unwrap();

        let service = ImportService::new(storage, String::new(), 3);
        assert!(matches!(
            service.import_dir(csv_dir.path()).await,
            Err(AcademicError::Import(_))
        ));
    }
}
