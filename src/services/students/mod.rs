pub mod courses;
pub mod profile;

use crate::errors::Result;
use crate::models::courses::responses::EnrollmentRecord;
use crate::models::people::entities::Student;
use crate::services::DashboardContext;
use crate::services::gpa::{GpaSummary, HypotheticalCourse, ImpactProjection, TargetProjection, analysis};

pub struct StudentService {
    ctx: DashboardContext,
}

impl StudentService {
    pub fn new(ctx: DashboardContext) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &DashboardContext {
        &self.ctx
    }

    // 个人信息
    pub async fn personal_info(&self) -> Result<Student> {
        profile::personal_info(self).await
    }

    // 已选课程
    pub async fn enrolled_courses(&self) -> Result<Vec<EnrollmentRecord>> {
        courses::enrolled_courses(self).await
    }

    // 当前 GPA
    pub async fn current_gpa(&self) -> Result<GpaSummary> {
        courses::current_gpa(self).await
    }

    pub async fn what_if_impact(&self, courses: &[HypotheticalCourse]) -> Result<ImpactProjection> {
        analysis::run_impact(&self.ctx, self.ctx.identity(), courses).await
    }

    pub async fn what_if_target(&self, target: f64) -> Result<TargetProjection> {
        analysis::run_target(&self.ctx, self.ctx.identity(), target).await
    }
}
