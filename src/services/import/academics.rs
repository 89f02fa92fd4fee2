use super::{
    INSTRUCTOR_COURSES_FILE, ImportService, ImportSummary, STUDENT_COURSES_FILE, row_number,
};
use crate::errors::{AcademicError, Result};
use crate::models::academics::{Grade, Term};
use crate::models::courses::requests::CreateCourseRequest;
use crate::utils::csv::CsvRow;

fn required<'a>(row: &'a CsvRow, column: &str) -> Result<&'a str> {
    row.get(column)
        .ok_or_else(|| AcademicError::validation(format!("Missing {column}")))
}

fn parse_term(row: &CsvRow, year_column: &str) -> Result<Term> {
    let semester = required(row, "Semester")?;
    let year = required(row, year_column)?;
    let year: i32 = year
        .parse()
        .map_err(|_| AcademicError::validation(format!("Invalid {year_column}: {year}")))?;
    Term::from_parts(semester, year)
        .ok_or_else(|| AcademicError::validation(format!("Invalid Semester: {semester}")))
}

/// 课程不存在时创建，返回是否新建
async fn ensure_course(
    service: &ImportService,
    prefix: &str,
    number: &str,
    credits: i32,
) -> Result<bool> {
    let storage = service.storage();
    if storage.get_course(prefix, number).await?.is_some() {
        return Ok(false);
    }
    storage
        .ensure_course(CreateCourseRequest {
            course_prefix: prefix.to_string(),
            course_number: number.to_string(),
            credits,
        })
        .await?;
    Ok(true)
}

async fn import_section_row(
    service: &ImportService,
    instructor_id: &str,
    row: &CsvRow,
    summary: &mut ImportSummary,
) -> Result<()> {
    let prefix = required(row, "CoursePrefix")?;
    let number = required(row, "CourseNumber")?;
    let credits = required(row, "Credits")?;
    let credits: i32 = credits
        .parse()
        .map_err(|_| AcademicError::validation(format!("Invalid Credits: {credits}")))?;
    let term = parse_term(row, "YearTaught")?;

    if ensure_course(service, prefix, number, credits).await? {
        summary.courses += 1;
    }

    let instructor = Some(instructor_id).filter(|id| !id.eq_ignore_ascii_case("TBA"));
    service
        .storage()
        .create_section(prefix, number, term, instructor)
        .await?;
    summary.sections += 1;
    Ok(())
}

pub async fn import_sections(
    service: &ImportService,
    rows: &[CsvRow],
    summary: &mut ImportSummary,
) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        let Some(instructor_id) = row.get("InstructorID") else {
            summary.skipped += 1;
            continue;
        };
        if let Err(e) = import_section_row(service, instructor_id, row, summary).await {
            summary.record_error(INSTRUCTOR_COURSES_FILE, row_number(index), e);
        }
    }
    Ok(())
}

async fn import_enrollment_row(
    service: &ImportService,
    student_id: &str,
    row: &CsvRow,
    summary: &mut ImportSummary,
) -> Result<()> {
    let prefix = required(row, "CoursePrefix")?;
    let number = required(row, "CourseNumber")?;
    let term = parse_term(row, "YearTaken")?;
    let grade = Grade::parse_optional(row.get("Grade")).map_err(AcademicError::validation)?;

    if ensure_course(service, prefix, number, service.assumed_course_credits()).await? {
        summary.courses += 1;
    }

    service
        .storage()
        .create_enrollment(
            student_id,
            prefix,
            number,
            term,
            grade.map(|g| g.to_string()),
        )
        .await?;
    summary.enrollments += 1;
    Ok(())
}

pub async fn import_enrollments(
    service: &ImportService,
    rows: &[CsvRow],
    summary: &mut ImportSummary,
) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        let Some(student_id) = row.get("StudentID") else {
            summary.skipped += 1;
            continue;
        };
        if let Err(e) = import_enrollment_row(service, student_id, row, summary).await {
            summary.record_error(STUDENT_COURSES_FILE, row_number(index), e);
        }
    }
    Ok(())
}
