//! GPA 计算
//!
//! 纯函数：输入 (学分, 成绩) 序列，输出绩点与学分累计。

pub mod analysis;
pub mod what_if;

use serde::Serialize;
use tracing::warn;

use crate::models::academics::Grade;
use crate::models::courses::responses::EnrollmentRecord;

pub use what_if::{
    HypotheticalCourse, ImpactProjection, TargetProjection, TargetRejection, courses_for_target,
    project_impact,
};

/// 绩点与学分累计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GpaSummary {
    /// 学分加权绩点之和
    pub total_points: f64,
    /// 已评分课程学分之和
    pub total_credits: i32,
}

impl GpaSummary {
    /// 从 (学分, 成绩) 序列累计，未评分的课程不计入
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i32, Option<Grade>)>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |mut acc, (credits, grade)| {
                if let Some(grade) = grade {
                    acc.total_points += grade.points() * credits as f64;
                    acc.total_credits += credits;
                }
                acc
            })
    }

    /// 从选课记录累计
    ///
    /// 无法识别的成绩与缺少课程学分的记录会被跳过并记录警告。
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a EnrollmentRecord>,
    {
        Self::from_pairs(records.into_iter().filter_map(graded_pair))
    }

    pub fn gpa(&self) -> f64 {
        if self.total_credits <= 0 {
            0.0
        } else {
            self.total_points / self.total_credits as f64
        }
    }

    /// 追加若干已评分课程
    pub fn with_added(&self, credits: i32, points: f64) -> Self {
        Self {
            total_points: self.total_points + points,
            total_credits: self.total_credits + credits,
        }
    }
}

fn graded_pair(record: &EnrollmentRecord) -> Option<(i32, Option<Grade>)> {
    let grade = match record.enrollment.parsed_grade() {
        Ok(grade) => grade?,
        Err(e) => {
            warn!(
                "Skipping enrollment {} with unknown grade: {}",
                record.enrollment.id, e
            );
            return None;
        }
    };
    match record.credits {
        Some(credits) => Some((credits, Some(grade))),
        None => {
            warn!(
                "Skipping enrollment {}: course {} not in catalogue",
                record.enrollment.id,
                record.enrollment.code()
            );
            None
        }
    }
}

/// 单门课程贡献的绩点（成绩 × 学分），未评分返回 None
pub fn course_points(record: &EnrollmentRecord) -> Option<f64> {
    let grade = record.enrollment.parsed_grade().ok()??;
    Some(grade.points() * record.credits? as f64)
}

/// 已通过课程获得的学分（A/B/C/D/S）
pub fn credits_earned<'a, I>(records: I) -> i32
where
    I: IntoIterator<Item = &'a EnrollmentRecord>,
{
    records
        .into_iter()
        .filter(|r| {
            matches!(
                r.enrollment.parsed_grade(),
                Ok(Some(Grade::A | Grade::B | Grade::C | Grade::D | Grade::S))
            )
        })
        .filter_map(|r| r.credits)
        .sum()
}

pub fn format_gpa(gpa: f64) -> String {
    format!("{gpa:.2}")
}
