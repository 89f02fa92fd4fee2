use super::args::{arg, parse_hypothetical, parse_term};
use super::student::{enrollment_table, parse_target, render_impact, render_target};
use super::table::{Table, or_dash};
use crate::errors::Result;
use crate::models::academics::Term;
use crate::models::people::responses::Advisee;
use crate::services::AdvisorService;
use crate::services::gpa::format_gpa;

pub const HELP: &str = "\
  departments               List advised departments
  advisees                  List advisees with GPA
  filter <text|\"\"> [dept]   Filter advisees by ID or major, and department
  progress <student>        Degree progress of an advisee
  history <student>         Course history with grade points
  term <student> <term>     Courses of a term with status, e.g. term S1 F2025
  terms                     Terms open for registration
  register <student> <prefix> <number> <term>
                            Register an advisee for a course
  drop <student> <prefix> <number> <term>
                            Drop an ungraded course
  whatif <student> <cr:grade>...
                            Project an advisee's GPA
  target <student> <gpa>    Courses needed for an advisee's target GPA";

pub async fn dispatch(
    service: &AdvisorService,
    command: &str,
    args: &[String],
) -> Result<Option<String>> {
    let output = match command {
        "departments" => {
            let departments = service.departments().await?;
            if departments.is_empty() {
                "No departments assigned".to_string()
            } else {
                departments.join("\n")
            }
        }
        "advisees" => advisee_table(&service.advisees().await?).render(),
        "filter" => {
            let search = args.first().map(String::as_str);
            let department = args.get(1).map(String::as_str);
            advisee_table(&service.search_advisees(search, department).await?).render()
        }
        "progress" => {
            let progress = service.progress(arg(args, 0, "student")?).await?;
            let mut table = Table::new(["Field", "Value"]);
            table.push(["Student".to_string(), progress.student_id.clone()]);
            table.push(["Major".to_string(), or_dash(progress.major.as_deref())]);
            table.push([
                "Hours required".to_string(),
                progress
                    .hours_required
                    .map(|h| h.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]);
            table.push(["Credits earned".to_string(), progress.credits_earned.to_string()]);
            table.push(["Courses taken".to_string(), progress.courses_taken.to_string()]);
            table.push(["GPA".to_string(), format_gpa(progress.gpa)]);
            table.push([
                "Complete".to_string(),
                progress
                    .percent_complete()
                    .map(|p| format!("{p:.1}%"))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
            table.render()
        }
        "history" => {
            let history = service.course_history(arg(args, 0, "student")?).await?;
            let mut table = Table::new(["Course", "Credits", "Term", "Grade", "Points"]);
            for entry in history {
                let e = &entry.record.enrollment;
                table.push([
                    e.code(),
                    entry
                        .record
                        .credits
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    format!("{} {}", e.semester, e.year),
                    or_dash(e.grade.as_deref()),
                    entry
                        .points
                        .map(|p| format!("{p:.1}"))
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            table.render()
        }
        "term" => {
            let student_id = arg(args, 0, "student")?;
            let term = parse_term(arg(args, 1, "term")?)?;
            let courses = service.term_courses(student_id, term).await?;
            let status = courses
                .first()
                .map(|c| c.status.to_string())
                .unwrap_or_else(|| "No courses".to_string());
            let records: Vec<_> = courses.into_iter().map(|c| c.record).collect();
            format!("{term}: {status}\n{}", enrollment_table(&records).render())
        }
        "terms" => Term::current()
            .upcoming()
            .iter()
            .map(|t| format!("{t} ({} {})", t.semester.name(), t.year))
            .collect::<Vec<_>>()
            .join("\n"),
        "register" => {
            let student_id = arg(args, 0, "student")?;
            let term = parse_term(arg(args, 3, "term")?)?;
            let enrollment = service
                .register(student_id, arg(args, 1, "prefix")?, arg(args, 2, "number")?, term)
                .await?;
            format!("Registered {} for {} in {}", student_id, enrollment.code(), term)
        }
        "drop" => {
            let student_id = arg(args, 0, "student")?;
            let term = parse_term(arg(args, 3, "term")?)?;
            let dropped = service
                .drop_course(student_id, arg(args, 1, "prefix")?, arg(args, 2, "number")?, term)
                .await?;
            format!("Dropped {} from {} in {}", student_id, dropped.code(), term)
        }
        "whatif" => {
            let student_id = arg(args, 0, "student")?;
            let courses = parse_hypothetical(&args[1..])?;
            render_impact(&service.what_if_impact(student_id, &courses).await?)
        }
        "target" => {
            let student_id = arg(args, 0, "student")?;
            let target = parse_target(arg(args, 1, "gpa")?)?;
            render_target(&service.what_if_target(student_id, target).await?)
        }
        _ => return Ok(None),
    };
    Ok(Some(output))
}

fn advisee_table(advisees: &[Advisee]) -> Table {
    let mut table = Table::new(["Student", "Gender", "Major", "Department", "GPA"]);
    for a in advisees {
        table.push([
            a.student_id.clone(),
            or_dash(a.gender.as_deref()),
            or_dash(a.major.as_deref()),
            a.department_id.clone(),
            format_gpa(a.gpa),
        ]);
    }
    table
}
