use serde_json::json;

use super::InstructorService;
use crate::errors::{AcademicError, Result};
use crate::models::courses::{
    entities::CourseSection,
    responses::{RosterEntry, SectionDetail},
};

pub async fn list_sections(service: &InstructorService) -> Result<Vec<SectionDetail>> {
    let ctx = service.ctx();
    let sections = ctx
        .storage
        .list_sections_by_instructor(ctx.identity())
        .await?;

    ctx.audit
        .log_data_access(
            "course",
            "assigned sections",
            Some(json!({ "instructor_id": ctx.identity(), "count": sections.len() })),
        )
        .await?;
    Ok(sections)
}

/// 取得本人承担的开课，他人的开课返回权限错误
pub(super) async fn owned_section(
    service: &InstructorService,
    section_id: i64,
) -> Result<CourseSection> {
    let ctx = service.ctx();
    let section = ctx
        .storage
        .get_section(section_id)
        .await?
        .ok_or_else(|| AcademicError::not_found(format!("Section {section_id} not found")))?;

    if section.instructor_id.as_deref() != Some(ctx.identity()) {
        return Err(AcademicError::authorization(format!(
            "Section {section_id} is not assigned to {}",
            ctx.identity()
        )));
    }
    Ok(section)
}

pub async fn roster(
    service: &InstructorService,
    section_id: i64,
) -> Result<(CourseSection, Vec<RosterEntry>)> {
    let section = owned_section(service, section_id).await?;
    let ctx = service.ctx();
    let roster = ctx.storage.list_roster(section_id).await?;

    ctx.audit
        .log_data_access(
            "roster",
            "section roster",
            Some(json!({
                "course": section.code(),
                "term": format!("{} {}", section.semester, section.year),
                "students": roster.len(),
            })),
        )
        .await?;
    Ok((section, roster))
}
