//! SeaORM 存储实现
//!
//! 统一的 SQLite 存储层，连接池启用 WAL 与 busy timeout。

mod courses;
mod departments;
mod enrollments;
mod operation_logs;
mod people;
mod sections;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{AcademicError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;
        let db = Self::connect_sqlite(&db_url, config).await?;

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Database migration failed: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AcademicError::database_config(format!("Failed to parse SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-16000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AcademicError::database_connection(format!("Failed to connect to SQLite: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 规范化数据库 URL，裸文件路径补全为 sqlite:// 形式
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url.ends_with(".sqlite3") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else {
            Err(AcademicError::database_config(format!(
                "Unrecognized database address: {url}. Supported: sqlite:// URLs or .db/.sqlite file paths"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    academics::{Grade, Term},
    audit::{
        entities::{OperationLog, OperationLogView},
        requests::{LogFilter, NewOperationLog},
    },
    courses::{
        entities::{Course, CourseSection, Enrollment},
        requests::{CreateCourseRequest, RegisterRequest, ScheduleSectionRequest, UpdateCourseRequest},
        responses::{EnrollmentRecord, RosterEntry, SectionDetail},
    },
    departments::{
        entities::{Department, DepartmentMajor, Major},
        requests::UpdateDepartmentRequest,
    },
    people::{
        entities::{Advisor, Instructor, StaffMember, Student},
        requests::{UpdateInstructorRequest, UpdateStudentRequest, UpsertPersonRequest},
        responses::PersonSaved,
    },
    users::{
        entities::{User, UserCredentials, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        self.get_user_credentials_impl(username).await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<u64> {
        self.count_users_by_role_impl(role).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 人员档案模块
    async fn upsert_person(&self, req: UpsertPersonRequest) -> Result<PersonSaved> {
        self.upsert_person_impl(req).await
    }

    async fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        self.get_student_impl(student_id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_instructor(&self, instructor_id: &str) -> Result<Option<Instructor>> {
        self.get_instructor_impl(instructor_id).await
    }

    async fn get_instructor_by_user_id(&self, user_id: i64) -> Result<Option<Instructor>> {
        self.get_instructor_by_user_id_impl(user_id).await
    }

    async fn get_advisor_by_user_id(&self, user_id: i64) -> Result<Option<Advisor>> {
        self.get_advisor_by_user_id_impl(user_id).await
    }

    async fn get_staff_by_user_id(&self, user_id: i64) -> Result<Option<StaffMember>> {
        self.get_staff_by_user_id_impl(user_id).await
    }

    async fn list_students_by_majors(&self, majors: &[String]) -> Result<Vec<Student>> {
        self.list_students_by_majors_impl(majors).await
    }

    async fn list_instructors_by_department(
        &self,
        department_id: &str,
    ) -> Result<Vec<Instructor>> {
        self.list_instructors_by_department_impl(department_id)
            .await
    }

    async fn update_student(
        &self,
        student_id: &str,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(student_id, update).await
    }

    async fn update_instructor(
        &self,
        instructor_id: &str,
        update: UpdateInstructorRequest,
    ) -> Result<Option<Instructor>> {
        self.update_instructor_impl(instructor_id, update).await
    }

    // 院系模块
    async fn upsert_department(&self, department: Department) -> Result<Department> {
        self.upsert_department_impl(department).await
    }

    async fn get_department(&self, department_id: &str) -> Result<Option<Department>> {
        self.get_department_impl(department_id).await
    }

    async fn update_department(
        &self,
        department_id: &str,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        self.update_department_impl(department_id, update).await
    }

    async fn ensure_major(&self, major_name: &str, default_hours_req: i32) -> Result<Major> {
        self.ensure_major_impl(major_name, default_hours_req).await
    }

    async fn add_major_to_department(
        &self,
        department_id: &str,
        major_name: &str,
        hours_req: i32,
    ) -> Result<DepartmentMajor> {
        self.add_major_to_department_impl(department_id, major_name, hours_req)
            .await
    }

    async fn list_department_majors(&self, department_id: &str) -> Result<Vec<DepartmentMajor>> {
        self.list_department_majors_impl(department_id).await
    }

    async fn get_major_hours_requirement(&self, major_name: &str) -> Result<Option<i32>> {
        self.get_major_hours_requirement_impl(major_name).await
    }

    async fn add_advisor_department(
        &self,
        advisor_id: &str,
        department_id: &str,
    ) -> Result<bool> {
        self.add_advisor_department_impl(advisor_id, department_id)
            .await
    }

    async fn list_advisor_departments(&self, advisor_id: &str) -> Result<Vec<String>> {
        self.list_advisor_departments_impl(advisor_id).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn ensure_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.ensure_course_impl(course).await
    }

    async fn get_course(&self, prefix: &str, number: &str) -> Result<Option<Course>> {
        self.get_course_impl(prefix, number).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_by_prefix(&self, prefix: &str) -> Result<Vec<Course>> {
        self.list_courses_by_prefix_impl(prefix).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    // 开课模块
    async fn create_section(
        &self,
        prefix: &str,
        number: &str,
        term: Term,
        instructor_id: Option<&str>,
    ) -> Result<CourseSection> {
        self.create_section_impl(prefix, number, term, instructor_id)
            .await
    }

    async fn schedule_section(
        &self,
        req: ScheduleSectionRequest,
        max_instructor_credits: i32,
    ) -> Result<CourseSection> {
        self.schedule_section_impl(req, max_instructor_credits)
            .await
    }

    async fn assign_instructor(
        &self,
        section_id: i64,
        instructor_id: &str,
        max_instructor_credits: i32,
    ) -> Result<CourseSection> {
        self.assign_instructor_impl(section_id, instructor_id, max_instructor_credits)
            .await
    }

    async fn get_section(&self, section_id: i64) -> Result<Option<CourseSection>> {
        self.get_section_impl(section_id).await
    }

    async fn list_sections_by_instructor(
        &self,
        instructor_id: &str,
    ) -> Result<Vec<SectionDetail>> {
        self.list_sections_by_instructor_impl(instructor_id).await
    }

    async fn list_sections_by_prefix(&self, prefix: &str) -> Result<Vec<SectionDetail>> {
        self.list_sections_by_prefix_impl(prefix).await
    }

    async fn instructor_term_credits(&self, instructor_id: &str, term: Term) -> Result<i32> {
        self.instructor_term_credits_impl(instructor_id, term).await
    }

    // 选课模块
    async fn create_enrollment(
        &self,
        student_id: &str,
        prefix: &str,
        number: &str,
        term: Term,
        grade: Option<String>,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(student_id, prefix, number, term, grade)
            .await
    }

    async fn list_enrollment_records(&self, student_id: &str) -> Result<Vec<EnrollmentRecord>> {
        self.list_enrollment_records_impl(student_id).await
    }

    async fn list_enrollment_records_for_students(
        &self,
        student_ids: &[String],
    ) -> Result<Vec<EnrollmentRecord>> {
        self.list_enrollment_records_for_students_impl(student_ids)
            .await
    }

    async fn register_enrollment(&self, req: RegisterRequest) -> Result<Enrollment> {
        self.register_enrollment_impl(req).await
    }

    async fn drop_enrollment(
        &self,
        student_id: &str,
        prefix: &str,
        number: &str,
        term: Term,
    ) -> Result<Enrollment> {
        self.drop_enrollment_impl(student_id, prefix, number, term)
            .await
    }

    async fn get_enrollment(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(enrollment_id).await
    }

    async fn list_roster(&self, section_id: i64) -> Result<Vec<RosterEntry>> {
        self.list_roster_impl(section_id).await
    }

    async fn set_grade(
        &self,
        enrollment_id: i64,
        grade: Option<Grade>,
    ) -> Result<Option<Enrollment>> {
        self.set_grade_impl(enrollment_id, grade).await
    }

    // 审计日志模块
    async fn append_log(&self, log: NewOperationLog) -> Result<OperationLog> {
        self.append_log_impl(log).await
    }

    async fn list_logs(&self, filter: LogFilter) -> Result<Vec<OperationLogView>> {
        self.list_logs_impl(filter).await
    }

    async fn list_log_actors(&self) -> Result<Vec<i64>> {
        self.list_log_actors_impl().await
    }

    async fn count_logs(&self) -> Result<u64> {
        self.count_logs_impl().await
    }

    async fn clear_logs(&self, clear_record: NewOperationLog) -> Result<OperationLog> {
        self.clear_logs_impl(clear_record).await
    }
}

/// 测试用的临时数据库
#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::config::DatabaseConfig;

    pub(crate) async fn temp_storage() -> (SeaOrmStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("academic_test.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            pool_size: 2,
            timeout: 10,
        };
        let storage = SeaOrmStorage::connect(&config).await.unwrap();
        (storage, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite://a.db?mode=rwc").unwrap(),
            "sqlite://a.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("records.db").unwrap(),
            "sqlite://records.db?mode=rwc"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://localhost/db").is_err());
    }
}
