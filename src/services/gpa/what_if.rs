//! 假设分析：追加假设课程后的 GPA，或达到目标 GPA 所需课程数

use serde::Serialize;

use super::GpaSummary;
use crate::errors::AcademicError;
use crate::models::academics::Grade;

const MAX_GPA: f64 = 4.0;

/// 假设课程，学分 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HypotheticalCourse {
    pub credits: i32,
    pub grade: Grade,
}

impl HypotheticalCourse {
    pub fn new(credits: i32, grade: Grade) -> Result<Self, AcademicError> {
        if !(1..=4).contains(&credits) {
            return Err(AcademicError::validation(format!(
                "Hypothetical course credits must be between 1 and 4, got {credits}"
            )));
        }
        Ok(Self { credits, grade })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactProjection {
    pub current_gpa: f64,
    pub projected_gpa: f64,
    pub added_credits: i32,
    pub total_credits: i32,
}

/// 追加假设课程后的 GPA，无假设课程时等于当前 GPA
pub fn project_impact(base: &GpaSummary, courses: &[HypotheticalCourse]) -> ImpactProjection {
    let projected = courses.iter().fold(*base, |acc, course| {
        acc.with_added(course.credits, course.grade.points() * course.credits as f64)
    });

    ImpactProjection {
        current_gpa: base.gpa(),
        projected_gpa: projected.gpa(),
        added_credits: projected.total_credits - base.total_credits,
        total_credits: projected.total_credits,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetProjection {
    pub current_gpa: f64,
    pub target_gpa: f64,
    /// 需要的全 A 学分
    pub credits_needed: f64,
    /// 按每门课标准学分折算，保留一位小数
    pub courses_needed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetRejection {
    NotFinite,
    NotAboveCurrent { current: f64, target: f64 },
    AboveMaximum { target: f64 },
    /// 目标为 4.0 而当前低于 4.0，永远无法达到
    Unreachable,
}

impl std::fmt::Display for TargetRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRejection::NotFinite => write!(f, "Target GPA must be a number"),
            TargetRejection::NotAboveCurrent { current, target } => write!(
                f,
                "Target GPA {target:.2} must be higher than current GPA {current:.2}"
            ),
            TargetRejection::AboveMaximum { target } => {
                write!(f, "Target GPA {target:.2} must not exceed 4.0")
            }
            TargetRejection::Unreachable => {
                write!(f, "A 4.0 GPA cannot be reached once a lower grade is recorded")
            }
        }
    }
}

impl From<TargetRejection> for AcademicError {
    fn from(rejection: TargetRejection) -> Self {
        AcademicError::validation(rejection.to_string())
    }
}

/// 达到目标 GPA 所需的全 A 课程数
///
/// `credits_needed = (target × 总学分 − 总绩点) / (4 − target)`
pub fn courses_for_target(
    base: &GpaSummary,
    target: f64,
    credits_per_course: u32,
) -> Result<TargetProjection, TargetRejection> {
    if !target.is_finite() {
        return Err(TargetRejection::NotFinite);
    }
    let current = base.gpa();
    if target > MAX_GPA {
        return Err(TargetRejection::AboveMaximum { target });
    }
    if target <= current {
        return Err(TargetRejection::NotAboveCurrent { current, target });
    }
    if target >= MAX_GPA {
        return Err(TargetRejection::Unreachable);
    }

    let credits_needed =
        (target * base.total_credits as f64 - base.total_points) / (MAX_GPA - target);
    let per_course = credits_per_course.max(1) as f64;
    let courses_needed = (credits_needed / per_course * 10.0).round() / 10.0;

    Ok(TargetProjection {
        current_gpa: current,
        target_gpa: target,
        credits_needed,
        courses_needed,
    })
}
