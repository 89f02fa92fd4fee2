pub mod advisees;
pub mod progress;
pub mod registration;

use crate::errors::Result;
use crate::models::academics::Term;
use crate::models::courses::{
    entities::Enrollment,
    responses::{CourseHistoryEntry, TermCourse},
};
use crate::models::people::responses::{Advisee, StudentProgress};
use crate::services::DashboardContext;
use crate::services::gpa::{HypotheticalCourse, ImpactProjection, TargetProjection, analysis};

pub use advisees::filter_advisees;

pub struct AdvisorService {
    ctx: DashboardContext,
}

impl AdvisorService {
    pub fn new(ctx: DashboardContext) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &DashboardContext {
        &self.ctx
    }

    // 导师负责的院系
    pub async fn departments(&self) -> Result<Vec<String>> {
        advisees::departments(self).await
    }

    // 名下学生及 GPA
    pub async fn advisees(&self) -> Result<Vec<Advisee>> {
        advisees::list_advisees(self).await
    }

    // 按关键字与院系筛选名下学生
    pub async fn search_advisees(
        &self,
        search: Option<&str>,
        department: Option<&str>,
    ) -> Result<Vec<Advisee>> {
        advisees::search_advisees(self, search, department).await
    }

    // 学业进度
    pub async fn progress(&self, student_id: &str) -> Result<StudentProgress> {
        progress::progress(self, student_id).await
    }

    // 课程历史及每门课的绩点贡献
    pub async fn course_history(&self, student_id: &str) -> Result<Vec<CourseHistoryEntry>> {
        progress::course_history(self, student_id).await
    }

    // 某学期课程及状态
    pub async fn term_courses(&self, student_id: &str, term: Term) -> Result<Vec<TermCourse>> {
        progress::term_courses(self, student_id, term).await
    }

    // 为学生注册选课
    pub async fn register(
        &self,
        student_id: &str,
        prefix: &str,
        number: &str,
        term: Term,
    ) -> Result<Enrollment> {
        registration::register(self, student_id, prefix, number, term).await
    }

    // 退课
    pub async fn drop_course(
        &self,
        student_id: &str,
        prefix: &str,
        number: &str,
        term: Term,
    ) -> Result<Enrollment> {
        registration::drop_course(self, student_id, prefix, number, term).await
    }

    pub async fn what_if_impact(
        &self,
        student_id: &str,
        courses: &[HypotheticalCourse],
    ) -> Result<ImpactProjection> {
        advisees::ensure_advisee(self, student_id).await?;
        analysis::run_impact(&self.ctx, student_id, courses).await
    }

    pub async fn what_if_target(&self, student_id: &str, target: f64) -> Result<TargetProjection> {
        advisees::ensure_advisee(self, student_id).await?;
        analysis::run_target(&self.ctx, student_id, target).await
    }
}
