use super::args::{arg, parse_hypothetical};
use super::table::{Table, or_dash};
use crate::errors::{AcademicError, Result};
use crate::models::courses::responses::EnrollmentRecord;
use crate::services::StudentService;
use crate::services::gpa::{GpaSummary, ImpactProjection, TargetProjection, format_gpa};

pub const HELP: &str = "\
  info                      Show personal information
  courses                   List enrolled courses with grades
  gpa                       Show current GPA
  whatif <cr:grade>...      Project GPA with hypothetical courses, e.g. whatif 3:A 4:B
  target <gpa>              Courses with A grades needed to reach a target GPA";

pub async fn dispatch(
    service: &StudentService,
    command: &str,
    args: &[String],
) -> Result<Option<String>> {
    let output = match command {
        "info" => {
            let student = service.personal_info().await?;
            let mut table = Table::new(["Field", "Value"]);
            table.push(["Student ID".to_string(), student.student_id]);
            table.push(["Gender".to_string(), or_dash(student.gender.as_deref())]);
            table.push(["Major".to_string(), or_dash(student.major.as_deref())]);
            table.render()
        }
        "courses" => {
            let records = service.enrolled_courses().await?;
            let summary = GpaSummary::from_records(&records);
            format!(
                "{}\nCurrent GPA: {}",
                enrollment_table(&records).render(),
                format_gpa(summary.gpa())
            )
        }
        "gpa" => {
            let summary = service.current_gpa().await?;
            format!(
                "Current GPA: {} ({} graded credits)",
                format_gpa(summary.gpa()),
                summary.total_credits
            )
        }
        "whatif" => {
            let courses = parse_hypothetical(args)?;
            render_impact(&service.what_if_impact(&courses).await?)
        }
        "target" => {
            let target = parse_target(arg(args, 0, "gpa")?)?;
            render_target(&service.what_if_target(target).await?)
        }
        _ => return Ok(None),
    };
    Ok(Some(output))
}

pub(crate) fn enrollment_table(records: &[EnrollmentRecord]) -> Table {
    let mut table = Table::new(["Course", "Credits", "Term", "Grade"]);
    for record in records {
        let e = &record.enrollment;
        table.push([
            e.code(),
            record.credits.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
            format!("{} {}", e.semester, e.year),
            e.grade
                .clone()
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| "In progress".to_string()),
        ]);
    }
    table
}

pub(crate) fn parse_target(raw: &str) -> Result<f64> {
    raw.parse()
        .map_err(|_| AcademicError::validation(format!("Invalid target GPA: {raw}")))
}

pub(crate) fn render_impact(projection: &ImpactProjection) -> String {
    format!(
        "Current GPA:   {}\nProjected GPA: {} (+{} credits, {} total)",
        format_gpa(projection.current_gpa),
        format_gpa(projection.projected_gpa),
        projection.added_credits,
        projection.total_credits
    )
}

pub(crate) fn render_target(projection: &TargetProjection) -> String {
    format!(
        "To reach a {} GPA from {}, approximately {} courses with A grades are needed ({:.1} credits).",
        format_gpa(projection.target_gpa),
        format_gpa(projection.current_gpa),
        projection.courses_needed,
        projection.credits_needed
    )
}
