use super::args::{arg, parse_assignments, parse_id, parse_term};
use super::table::{Table, or_dash};
use crate::errors::{AcademicError, Result};
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::departments::requests::UpdateDepartmentRequest;
use crate::models::people::requests::{UpdateInstructorRequest, UpdateStudentRequest};
use crate::services::StaffService;

pub const HELP: &str = "\
  department                Show department information and majors
  edit-department [building=..] [office=..]
  courses                   List department courses
  add-course <number> <credits>
  edit-course <course-id> [number=..] [credits=..]
  remove-course <course-id>
  instructors               List department instructors
  edit-instructor <id> [phone=..] [hired=..]
  students                  List department students
  edit-student <id> [gender=..] [major=..]
  sections                  List department sections
  schedule <number> <term> [instructor]
                            Schedule a section, instructor defaults to TBA
  assign <section> <instructor>
                            Assign an instructor to a TBA section";

pub async fn dispatch(
    service: &StaffService,
    command: &str,
    args: &[String],
) -> Result<Option<String>> {
    let output = match command {
        "department" => {
            let overview = service.department_info().await?;
            let d = &overview.department;
            let mut majors = Table::new(["Major", "Hours required"]);
            for m in &overview.majors {
                majors.push([m.major_name.clone(), m.hours_req.to_string()]);
            }
            format!(
                "Department: {}\nBuilding:   {}\nOffice:     {}\n\n{}",
                d.department_id,
                or_dash(d.building.as_deref()),
                or_dash(d.office.as_deref()),
                majors.render()
            )
        }
        "edit-department" => {
            let mut fields = parse_assignments(args, &["building", "office"])?;
            let department = service
                .update_department(UpdateDepartmentRequest {
                    building: fields.remove("building"),
                    office: fields.remove("office"),
                })
                .await?;
            format!(
                "Updated {}: building {}, office {}",
                department.department_id,
                or_dash(department.building.as_deref()),
                or_dash(department.office.as_deref())
            )
        }
        "courses" => {
            let mut table = Table::new(["ID", "Course", "Credits"]);
            for c in service.list_courses().await? {
                table.push([c.course_id.to_string(), c.code(), c.credits.to_string()]);
            }
            table.render()
        }
        "add-course" => {
            let number = arg(args, 0, "number")?;
            let credits = parse_credits(arg(args, 1, "credits")?)?;
            let course = service.add_course(number, credits).await?;
            format!("Added {} ({} credits), id {}", course.code(), course.credits, course.course_id)
        }
        "edit-course" => {
            let course_id = parse_id(arg(args, 0, "course-id")?, "course id")?;
            let mut fields = parse_assignments(&args[1..], &["number", "credits"])?;
            let credits = fields
                .remove("credits")
                .map(|c| parse_credits(&c))
                .transpose()?;
            let course = service
                .update_course(
                    course_id,
                    UpdateCourseRequest {
                        course_number: fields.remove("number"),
                        credits,
                    },
                )
                .await?;
            format!("Updated {} ({} credits)", course.code(), course.credits)
        }
        "remove-course" => {
            let course_id = parse_id(arg(args, 0, "course-id")?, "course id")?;
            let course = service.remove_course(course_id).await?;
            format!("Removed {}", course.code())
        }
        "instructors" => {
            let mut table = Table::new(["Instructor", "Phone", "Hired"]);
            for i in service.list_instructors().await? {
                table.push([
                    i.instructor_id,
                    or_dash(i.phone.as_deref()),
                    or_dash(i.hired_semester.as_deref()),
                ]);
            }
            table.render()
        }
        "edit-instructor" => {
            let instructor_id = arg(args, 0, "id")?;
            let mut fields = parse_assignments(&args[1..], &["phone", "hired"])?;
            let instructor = service
                .update_instructor(
                    instructor_id,
                    UpdateInstructorRequest {
                        phone: fields.remove("phone"),
                        hired_semester: fields.remove("hired"),
                    },
                )
                .await?;
            format!(
                "Updated {}: phone {}, hired {}",
                instructor.instructor_id,
                or_dash(instructor.phone.as_deref()),
                or_dash(instructor.hired_semester.as_deref())
            )
        }
        "students" => {
            let mut table = Table::new(["Student", "Gender", "Major"]);
            for s in service.list_students().await? {
                table.push([
                    s.student_id,
                    or_dash(s.gender.as_deref()),
                    or_dash(s.major.as_deref()),
                ]);
            }
            table.render()
        }
        "edit-student" => {
            let student_id = arg(args, 0, "id")?;
            let mut fields = parse_assignments(&args[1..], &["gender", "major"])?;
            let student = service
                .update_student(
                    student_id,
                    UpdateStudentRequest {
                        gender: fields.remove("gender"),
                        major: fields.remove("major"),
                    },
                )
                .await?;
            format!(
                "Updated {}: gender {}, major {}",
                student.student_id,
                or_dash(student.gender.as_deref()),
                or_dash(student.major.as_deref())
            )
        }
        "sections" => {
            let mut table = Table::new(["Section", "Course", "Term", "Instructor", "Enrolled"]);
            for detail in service.list_sections().await? {
                let s = &detail.section;
                table.push([
                    s.id.to_string(),
                    s.code(),
                    format!("{} {}", s.semester, s.year),
                    s.instructor_label().to_string(),
                    detail.enrolled.to_string(),
                ]);
            }
            table.render()
        }
        "schedule" => {
            let number = arg(args, 0, "number")?;
            let term = parse_term(arg(args, 1, "term")?)?;
            let instructor = args.get(2).map(String::as_str);
            let section = service.schedule_section(number, term, instructor).await?;
            format!(
                "Scheduled {} for {} (section {}, instructor {})",
                section.code(),
                term,
                section.id,
                section.instructor_label()
            )
        }
        "assign" => {
            let section_id = parse_id(arg(args, 0, "section")?, "section id")?;
            let instructor_id = arg(args, 1, "instructor")?;
            let section = service.assign_instructor(section_id, instructor_id).await?;
            format!(
                "Assigned {} to {} {} {}",
                section.instructor_label(),
                section.code(),
                section.semester,
                section.year
            )
        }
        _ => return Ok(None),
    };
    Ok(Some(output))
}

fn parse_credits(raw: &str) -> Result<i32> {
    raw.parse()
        .map_err(|_| AcademicError::validation(format!("Invalid credits: {raw}")))
}
