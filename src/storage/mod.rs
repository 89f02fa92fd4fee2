use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;
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

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 读取登录校验用的用户记录（角色不可识别时不报错）
    async fn get_user_credentials(&self, username: &str) -> Result<Option<UserCredentials>>;
    // 统计某角色的用户数量
    async fn count_users_by_role(&self, role: UserRole) -> Result<u64>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 人员档案方法
    // 创建或更新人员档案（用户与档案在同一事务内写入）
    async fn upsert_person(&self, req: UpsertPersonRequest) -> Result<PersonSaved>;
    async fn get_student(&self, student_id: &str) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_instructor(&self, instructor_id: &str) -> Result<Option<Instructor>>;
    async fn get_instructor_by_user_id(&self, user_id: i64) -> Result<Option<Instructor>>;
    async fn get_advisor_by_user_id(&self, user_id: i64) -> Result<Option<Advisor>>;
    async fn get_staff_by_user_id(&self, user_id: i64) -> Result<Option<StaffMember>>;
    // 列出主修给定专业的学生
    async fn list_students_by_majors(&self, majors: &[String]) -> Result<Vec<Student>>;
    // 列出院系教师
    async fn list_instructors_by_department(&self, department_id: &str)
    -> Result<Vec<Instructor>>;
    async fn update_student(
        &self,
        student_id: &str,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn update_instructor(
        &self,
        instructor_id: &str,
        update: UpdateInstructorRequest,
    ) -> Result<Option<Instructor>>;

    /// 院系与专业方法
    // 创建或覆盖院系
    async fn upsert_department(&self, department: Department) -> Result<Department>;
    async fn get_department(&self, department_id: &str) -> Result<Option<Department>>;
    async fn update_department(
        &self,
        department_id: &str,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    // 专业不存在时创建
    async fn ensure_major(&self, major_name: &str, default_hours_req: i32) -> Result<Major>;
    // 关联院系与专业，已存在时更新学时要求
    async fn add_major_to_department(
        &self,
        department_id: &str,
        major_name: &str,
        hours_req: i32,
    ) -> Result<DepartmentMajor>;
    async fn list_department_majors(&self, department_id: &str) -> Result<Vec<DepartmentMajor>>;
    // 专业毕业学时要求（院系设置优先，其次为专业默认值）
    async fn get_major_hours_requirement(&self, major_name: &str) -> Result<Option<i32>>;
    // 关联导师与院系，返回是否新增
    async fn add_advisor_department(&self, advisor_id: &str, department_id: &str)
    -> Result<bool>;
    async fn list_advisor_departments(&self, advisor_id: &str) -> Result<Vec<String>>;

    /// 课程方法
    // 创建课程，重复时返回冲突错误
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 课程不存在时创建，存在时原样返回
    async fn ensure_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course(&self, prefix: &str, number: &str) -> Result<Option<Course>>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn list_courses_by_prefix(&self, prefix: &str) -> Result<Vec<Course>>;
    // 更新课程，课程号变更时同步开课与选课记录
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    // 删除课程，仍有开课或选课记录时返回冲突错误
    async fn delete_course(&self, course_id: i64) -> Result<bool>;

    /// 开课方法
    // 直接写入开课记录（导入用，不做检查）
    async fn create_section(
        &self,
        prefix: &str,
        number: &str,
        term: Term,
        instructor_id: Option<&str>,
    ) -> Result<CourseSection>;
    // 排课：重复检查与教师学分上限检查
    async fn schedule_section(
        &self,
        req: ScheduleSectionRequest,
        max_instructor_credits: i32,
    ) -> Result<CourseSection>;
    // 为待定开课指定教师
    async fn assign_instructor(
        &self,
        section_id: i64,
        instructor_id: &str,
        max_instructor_credits: i32,
    ) -> Result<CourseSection>;
    async fn get_section(&self, section_id: i64) -> Result<Option<CourseSection>>;
    // 教师开课记录，按学期倒序
    async fn list_sections_by_instructor(&self, instructor_id: &str)
    -> Result<Vec<SectionDetail>>;
    async fn list_sections_by_prefix(&self, prefix: &str) -> Result<Vec<SectionDetail>>;
    // 教师某学期已承担学分
    async fn instructor_term_credits(&self, instructor_id: &str, term: Term) -> Result<i32>;

    /// 选课方法
    // 直接写入选课记录（导入用）
    async fn create_enrollment(
        &self,
        student_id: &str,
        prefix: &str,
        number: &str,
        term: Term,
        grade: Option<String>,
    ) -> Result<Enrollment>;
    // 学生选课记录及学分
    async fn list_enrollment_records(&self, student_id: &str) -> Result<Vec<EnrollmentRecord>>;
    async fn list_enrollment_records_for_students(
        &self,
        student_ids: &[String],
    ) -> Result<Vec<EnrollmentRecord>>;
    // 注册选课：课程存在性与重复检查
    async fn register_enrollment(&self, req: RegisterRequest) -> Result<Enrollment>;
    // 退课：仅允许未评分的记录
    async fn drop_enrollment(
        &self,
        student_id: &str,
        prefix: &str,
        number: &str,
        term: Term,
    ) -> Result<Enrollment>;
    async fn get_enrollment(&self, enrollment_id: i64) -> Result<Option<Enrollment>>;
    // 开课名单
    async fn list_roster(&self, section_id: i64) -> Result<Vec<RosterEntry>>;
    // 记录成绩
    async fn set_grade(
        &self,
        enrollment_id: i64,
        grade: Option<Grade>,
    ) -> Result<Option<Enrollment>>;

    /// 审计日志方法
    async fn append_log(&self, log: NewOperationLog) -> Result<OperationLog>;
    // 按条件列出日志，最新在前
    async fn list_logs(&self, filter: LogFilter) -> Result<Vec<OperationLogView>>;
    // 出现过的操作者
    async fn list_log_actors(&self) -> Result<Vec<i64>>;
    async fn count_logs(&self) -> Result<u64>;
    // 清空日志并写入一条清空记录（同一事务）
    async fn clear_logs(&self, clear_record: NewOperationLog) -> Result<OperationLog>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
