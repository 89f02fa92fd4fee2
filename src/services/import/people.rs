use super::{
    DEPARTMENTS_FILE, INSTRUCTORS_FILE, ImportService, ImportSummary, STAFF_FILE, STUDENTS_FILE,
    row_number,
};
use crate::errors::{AcademicError, Result};
use crate::models::departments::entities::Department;
use crate::models::people::requests::{ProfileDetails, UpsertPersonRequest};
use crate::models::people::responses::PersonSaved;
use crate::utils::csv::CsvRow;
use crate::utils::validate::validate_person_id;

async fn save_person(
    service: &ImportService,
    person_id: &str,
    details: ProfileDetails,
) -> Result<PersonSaved> {
    validate_person_id(person_id).map_err(AcademicError::validation)?;
    service
        .storage()
        .upsert_person(UpsertPersonRequest {
            person_id: person_id.to_string(),
            password_hash: service.password_hash().to_string(),
            details,
        })
        .await
}

pub async fn import_students(
    service: &ImportService,
    rows: &[CsvRow],
    summary: &mut ImportSummary,
) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        let Some(student_id) = row.get("StudentID") else {
            summary.skipped += 1;
            continue;
        };
        let details = ProfileDetails::Student {
            gender: row.get_owned("Gender"),
            major: row.get_owned("Major"),
        };
        match save_person(service, student_id, details).await {
            Ok(_) => summary.students += 1,
            Err(e) => summary.record_error(STUDENTS_FILE, row_number(index), e),
        }
    }
    Ok(())
}

pub async fn import_instructors(
    service: &ImportService,
    rows: &[CsvRow],
    summary: &mut ImportSummary,
) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        let Some(instructor_id) = row.get("InstructorID") else {
            summary.skipped += 1;
            continue;
        };
        let details = ProfileDetails::Instructor {
            phone: row.get_owned("InstructorPhone"),
            department_id: row.get_owned("DepartmentID"),
            hired_semester: row.get_owned("HiredSemester"),
        };
        match save_person(service, instructor_id, details).await {
            Ok(_) => summary.instructors += 1,
            Err(e) => summary.record_error(INSTRUCTORS_FILE, row_number(index), e),
        }
    }
    Ok(())
}

pub async fn import_staff(
    service: &ImportService,
    rows: &[CsvRow],
    summary: &mut ImportSummary,
) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        let Some(staff_id) = row.get("StaffID") else {
            summary.skipped += 1;
            continue;
        };
        let details = ProfileDetails::Staff {
            department_id: row.get_owned("DepartmentID"),
            phone: row.get_owned("Phone"),
        };
        match save_person(service, staff_id, details).await {
            Ok(_) => summary.staff += 1,
            Err(e) => summary.record_error(STAFF_FILE, row_number(index), e),
        }
    }
    Ok(())
}

/// 一行院系数据：院系、开设专业与负责导师
async fn import_department_row(
    service: &ImportService,
    department_id: &str,
    row: &CsvRow,
    summary: &mut ImportSummary,
) -> Result<()> {
    let storage = service.storage();
    storage
        .upsert_department(Department {
            department_id: department_id.to_string(),
            building: row.get_owned("Building"),
            office: row.get_owned("Office"),
        })
        .await?;
    summary.departments += 1;

    if let (Some(major), Some(hours)) = (row.get("MajorOffered"), row.get("TotalHoursReq")) {
        let hours: i32 = hours.parse().map_err(|_| {
            AcademicError::validation(format!("Invalid TotalHoursReq: {hours}"))
        })?;
        storage.ensure_major(major, hours).await?;
        storage
            .add_major_to_department(department_id, major, hours)
            .await?;
        summary.majors += 1;
    }

    if let Some(advisor_id) = row.get("AdvisorID") {
        let saved = save_person(
            service,
            advisor_id,
            ProfileDetails::Advisor {
                phone: row.get_owned("AdvisorPhone"),
            },
        )
        .await?;
        if saved.created_user {
            summary.advisors += 1;
        }
        storage
            .add_advisor_department(advisor_id, department_id)
            .await?;
    }
    Ok(())
}

pub async fn import_departments(
    service: &ImportService,
    rows: &[CsvRow],
    summary: &mut ImportSummary,
) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        let Some(department_id) = row.get("DepartmentID") else {
            summary.skipped += 1;
            continue;
        };
        if let Err(e) = import_department_row(service, department_id, row, summary).await {
            summary.record_error(DEPARTMENTS_FILE, row_number(index), e);
        }
    }
    Ok(())
}
