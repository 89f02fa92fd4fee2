use std::collections::HashMap;

use serde_json::json;

use super::AdvisorService;
use crate::errors::{AcademicError, Result};
use crate::models::audit::entities::OperationKind;
use crate::models::courses::responses::EnrollmentRecord;
use crate::models::people::responses::Advisee;
use crate::services::gpa::GpaSummary;

pub async fn departments(service: &AdvisorService) -> Result<Vec<String>> {
    let ctx = service.ctx();
    ctx.storage.list_advisor_departments(ctx.identity()).await
}

/// 专业 -> 开设该专业的院系（取导师负责院系中的第一个）
async fn major_departments(service: &AdvisorService) -> Result<HashMap<String, String>> {
    let ctx = service.ctx();
    let mut majors = HashMap::new();
    for department_id in departments(service).await? {
        for dm in ctx.storage.list_department_majors(&department_id).await? {
            majors
                .entry(dm.major_name)
                .or_insert_with(|| department_id.clone());
        }
    }
    Ok(majors)
}

async fn load_advisees(service: &AdvisorService) -> Result<Vec<Advisee>> {
    let ctx = service.ctx();
    let majors = major_departments(service).await?;
    if majors.is_empty() {
        return Ok(Vec::new());
    }

    let major_names: Vec<String> = majors.keys().cloned().collect();
    let students = ctx.storage.list_students_by_majors(&major_names).await?;
    let ids: Vec<String> = students.iter().map(|s| s.student_id.clone()).collect();

    let mut records: HashMap<String, Vec<EnrollmentRecord>> = HashMap::new();
    for record in ctx
        .storage
        .list_enrollment_records_for_students(&ids)
        .await?
    {
        records
            .entry(record.enrollment.student_id.clone())
            .or_default()
            .push(record);
    }

    let mut advisees: Vec<Advisee> = students
        .into_iter()
        .map(|student| {
            let gpa = records
                .get(&student.student_id)
                .map(|r| GpaSummary::from_records(r).gpa())
                .unwrap_or(0.0);
            let department_id = student
                .major
                .as_ref()
                .and_then(|m| majors.get(m))
                .cloned()
                .unwrap_or_default();
            Advisee {
                student_id: student.student_id,
                gender: student.gender,
                major: student.major,
                department_id,
                gpa,
            }
        })
        .collect();
    advisees.sort_by(|a, b| a.student_id.cmp(&b.student_id));
    Ok(advisees)
}

pub async fn list_advisees(service: &AdvisorService) -> Result<Vec<Advisee>> {
    let advisees = load_advisees(service).await?;
    service
        .ctx()
        .audit
        .log_data_access(
            "advisee",
            "advisee list",
            Some(json!({ "count": advisees.len() })),
        )
        .await?;
    Ok(advisees)
}

/// 关键字匹配学号或专业（不区分大小写），院系精确匹配
pub fn filter_advisees(
    advisees: &[Advisee],
    search: Option<&str>,
    department: Option<&str>,
) -> Vec<Advisee> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let department = department.map(str::trim).filter(|d| !d.is_empty());

    advisees
        .iter()
        .filter(|a| match &needle {
            Some(needle) => {
                a.student_id.to_lowercase().contains(needle.as_str())
                    || a
                        .major
                        .as_deref()
                        .is_some_and(|m| m.to_lowercase().contains(needle.as_str()))
            }
            None => true,
        })
        .filter(|a| department.is_none_or(|d| a.department_id.eq_ignore_ascii_case(d)))
        .cloned()
        .collect()
}

pub async fn search_advisees(
    service: &AdvisorService,
    search: Option<&str>,
    department: Option<&str>,
) -> Result<Vec<Advisee>> {
    let advisees = load_advisees(service).await?;
    let filtered = filter_advisees(&advisees, search, department);

    service
        .ctx()
        .audit
        .log(
            OperationKind::Filter,
            "Filtered advisees",
            Some(&json!({
                "search": search.unwrap_or(""),
                "department": department.unwrap_or("All"),
                "matches": filtered.len(),
            })),
        )
        .await?;
    Ok(filtered)
}

/// 确认学生属于当前导师
pub async fn ensure_advisee(service: &AdvisorService, student_id: &str) -> Result<Advisee> {
    load_advisees(service)
        .await?
        .into_iter()
        .find(|a| a.student_id == student_id)
        .ok_or_else(|| {
            AcademicError::authorization(format!(
                "Student {student_id} is not an advisee of {}",
                service.ctx().identity()
            ))
        })
}
