use super::args::{arg, parse_grade, parse_id};
use super::table::{Table, or_dash};
use crate::errors::Result;
use crate::services::InstructorService;

pub const HELP: &str = "\
  sections                  List assigned sections, newest term first
  roster <section>          Show the students enrolled in a section
  grade <section> <student> <grade|none>
                            Record a grade (A B C D F S U I)";

pub async fn dispatch(
    service: &InstructorService,
    command: &str,
    args: &[String],
) -> Result<Option<String>> {
    let output = match command {
        "sections" => {
            let sections = service.list_sections().await?;
            let mut table = Table::new(["Section", "Course", "Credits", "Term", "Enrolled"]);
            for detail in sections {
                let s = &detail.section;
                table.push([
                    s.id.to_string(),
                    s.code(),
                    detail.credits.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                    format!("{} {}", s.semester, s.year),
                    detail.enrolled.to_string(),
                ]);
            }
            table.render()
        }
        "roster" => {
            let section_id = parse_id(arg(args, 0, "section")?, "section id")?;
            let (section, roster) = service.roster(section_id).await?;
            let mut table = Table::new(["Student", "Gender", "Major", "Grade"]);
            for entry in roster {
                table.push([
                    entry.student_id,
                    or_dash(entry.gender.as_deref()),
                    or_dash(entry.major.as_deref()),
                    or_dash(entry.grade.as_deref()),
                ]);
            }
            format!(
                "{} {} {}\n{}",
                section.code(),
                section.semester,
                section.year,
                table.render()
            )
        }
        "grade" => {
            let section_id = parse_id(arg(args, 0, "section")?, "section id")?;
            let student_id = arg(args, 1, "student")?;
            let grade = parse_grade(arg(args, 2, "grade")?)?;
            let updated = service.record_grade(section_id, student_id, grade).await?;
            format!(
                "Recorded grade {} for {} in {}",
                or_dash(updated.grade.as_deref()),
                student_id,
                updated.code()
            )
        }
        _ => return Ok(None),
    };
    Ok(Some(output))
}
