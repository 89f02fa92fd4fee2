//! 记录审计日志的 GPA 分析

use serde_json::json;
use tracing::info;

use super::{
    GpaSummary, HypotheticalCourse, ImpactProjection, TargetProjection, courses_for_target,
    project_impact,
};
use crate::errors::Result;
use crate::models::courses::responses::EnrollmentRecord;
use crate::services::DashboardContext;

/// 学生的选课记录与 GPA 累计
pub async fn load_summary(
    ctx: &DashboardContext,
    student_id: &str,
) -> Result<(Vec<EnrollmentRecord>, GpaSummary)> {
    let records = ctx.storage.list_enrollment_records(student_id).await?;
    let summary = GpaSummary::from_records(&records);
    Ok((records, summary))
}

pub async fn run_impact(
    ctx: &DashboardContext,
    student_id: &str,
    courses: &[HypotheticalCourse],
) -> Result<ImpactProjection> {
    let (_, summary) = load_summary(ctx, student_id).await?;
    let projection = project_impact(&summary, courses);

    ctx.audit
        .log_analysis(
            "GPA Impact",
            json!({ "courses": courses }),
            json!({
                "current_gpa": format!("{:.2}", projection.current_gpa),
                "projected_gpa": format!("{:.2}", projection.projected_gpa),
            }),
            Some(student_id),
        )
        .await?;

    info!(
        "What-if impact for {}: {:.2} -> {:.2}",
        student_id, projection.current_gpa, projection.projected_gpa
    );
    Ok(projection)
}

pub async fn run_target(
    ctx: &DashboardContext,
    student_id: &str,
    target: f64,
) -> Result<TargetProjection> {
    let (_, summary) = load_summary(ctx, student_id).await?;
    let projection = courses_for_target(&summary, target, ctx.academic.assumed_course_credits)?;

    ctx.audit
        .log_analysis(
            "Target GPA",
            json!({ "target_gpa": target }),
            json!({
                "current_gpa": format!("{:.2}", projection.current_gpa),
                "courses_needed": projection.courses_needed,
            }),
            Some(student_id),
        )
        .await?;

    info!(
        "What-if target for {}: {:.2} needs {} courses",
        student_id, target, projection.courses_needed
    );
    Ok(projection)
}
