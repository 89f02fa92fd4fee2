use serde::Serialize;

use super::entities::{CourseSection, Enrollment, EnrollmentStatus};

/// 选课记录及课程学分，课程不存在时学分为 None
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrollmentRecord {
    pub enrollment: Enrollment,
    pub credits: Option<i32>,
}

/// 开课记录及选课人数
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectionDetail {
    pub section: CourseSection,
    pub credits: Option<i32>,
    pub enrolled: u64,
}

// 课堂名单
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RosterEntry {
    pub enrollment_id: i64,
    pub student_id: String,
    pub gender: Option<String>,
    pub major: Option<String>,
    pub grade: Option<String>,
}

/// 课程历史条目，`points` 为该课程贡献的学分加权绩点
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CourseHistoryEntry {
    pub record: EnrollmentRecord,
    pub points: Option<f64>,
}

// 某学期的课程及状态
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TermCourse {
    pub record: EnrollmentRecord,
    pub status: EnrollmentStatus,
}
