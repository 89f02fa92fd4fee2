pub mod courses;
pub mod department;
pub mod people;
pub mod sections;

use crate::errors::{AcademicError, Result};
use crate::models::academics::Term;
use crate::models::courses::{
    entities::{Course, CourseSection},
    requests::UpdateCourseRequest,
    responses::SectionDetail,
};
use crate::models::departments::{requests::UpdateDepartmentRequest, responses::DepartmentOverview};
use crate::models::departments::entities::Department;
use crate::models::people::{
    entities::{Instructor, Student},
    requests::{UpdateInstructorRequest, UpdateStudentRequest},
};
use crate::services::DashboardContext;

/// 职员可设置的课程学分范围
pub const MIN_COURSE_CREDITS: i32 = 1;
pub const MAX_COURSE_CREDITS: i32 = 6;

pub struct StaffService {
    ctx: DashboardContext,
}

impl StaffService {
    pub fn new(ctx: DashboardContext) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &DashboardContext {
        &self.ctx
    }

    /// 职员所属院系
    pub(crate) async fn department_id(&self) -> Result<String> {
        let staff = self
            .ctx
            .storage
            .get_staff_by_user_id(self.ctx.session.user_id)
            .await?
            .ok_or_else(|| {
                AcademicError::not_found(format!("Staff profile {} not found", self.ctx.identity()))
            })?;
        staff.department_id.filter(|d| !d.is_empty()).ok_or_else(|| {
            AcademicError::validation(format!("Staff {} has no department", staff.staff_id))
        })
    }

    // 院系信息及开设专业
    pub async fn department_info(&self) -> Result<DepartmentOverview> {
        department::department_info(self).await
    }

    // 修改院系楼宇与办公室
    pub async fn update_department(&self, update: UpdateDepartmentRequest) -> Result<Department> {
        department::update_department(self, update).await
    }

    // 院系课程
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        courses::list_courses(self).await
    }

    pub async fn add_course(&self, number: &str, credits: i32) -> Result<Course> {
        courses::add_course(self, number, credits).await
    }

    pub async fn update_course(&self, course_id: i64, update: UpdateCourseRequest) -> Result<Course> {
        courses::update_course(self, course_id, update).await
    }

    pub async fn remove_course(&self, course_id: i64) -> Result<Course> {
        courses::remove_course(self, course_id).await
    }

    // 院系教师
    pub async fn list_instructors(&self) -> Result<Vec<Instructor>> {
        people::list_instructors(self).await
    }

    pub async fn update_instructor(
        &self,
        instructor_id: &str,
        update: UpdateInstructorRequest,
    ) -> Result<Instructor> {
        people::update_instructor(self, instructor_id, update).await
    }

    // 院系学生（主修本院系开设的专业）
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        people::list_students(self).await
    }

    pub async fn update_student(
        &self,
        student_id: &str,
        update: UpdateStudentRequest,
    ) -> Result<Student> {
        people::update_student(self, student_id, update).await
    }

    // 院系开课
    pub async fn list_sections(&self) -> Result<Vec<SectionDetail>> {
        sections::list_sections(self).await
    }

    // 排课，教师可待定
    pub async fn schedule_section(
        &self,
        number: &str,
        term: Term,
        instructor_id: Option<&str>,
    ) -> Result<CourseSection> {
        sections::schedule_section(self, number, term, instructor_id).await
    }

    // 为待定开课指定教师
    pub async fn assign_instructor(
        &self,
        section_id: i64,
        instructor_id: &str,
    ) -> Result<CourseSection> {
        sections::assign_instructor(self, section_id, instructor_id).await
    }
}
