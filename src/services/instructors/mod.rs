pub mod grading;
pub mod sections;

use crate::errors::Result;
use crate::models::academics::Grade;
use crate::models::courses::{
    entities::{CourseSection, Enrollment},
    responses::{RosterEntry, SectionDetail},
};
use crate::services::DashboardContext;

pub struct InstructorService {
    ctx: DashboardContext,
}

impl InstructorService {
    pub fn new(ctx: DashboardContext) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &DashboardContext {
        &self.ctx
    }

    // 本人承担的开课，最新学期在前
    pub async fn list_sections(&self) -> Result<Vec<SectionDetail>> {
        sections::list_sections(self).await
    }

    // 开课名单
    pub async fn roster(&self, section_id: i64) -> Result<(CourseSection, Vec<RosterEntry>)> {
        sections::roster(self, section_id).await
    }

    // 为名单中的学生记录成绩
    pub async fn record_grade(
        &self,
        section_id: i64,
        student_id: &str,
        grade: Option<Grade>,
    ) -> Result<Enrollment> {
        grading::record_grade(self, section_id, student_id, grade).await
    }
}
