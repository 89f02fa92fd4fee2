//! 院系、专业与导师院系关联存储实现

use super::SeaOrmStorage;
use crate::entity::prelude::{AdvisorDepartments, DepartmentMajors, Departments, Majors};
use crate::entity::{advisor_departments, department_majors, departments, majors};
use crate::errors::{AcademicError, Result};
use crate::models::departments::{
    entities::{Department, DepartmentMajor, Major},
    requests::UpdateDepartmentRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建或覆盖院系信息
    pub async fn upsert_department_impl(&self, department: Department) -> Result<Department> {
        let existing = Departments::find_by_id(department.department_id.clone())
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query department: {e}")))?;

        let active = departments::ActiveModel {
            department_id: Set(department.department_id),
            building: Set(department.building),
            office: Set(department.office),
        };

        let saved = if existing.is_some() {
            active.update(&self.db).await
        } else {
            active.insert(&self.db).await
        }
        .map_err(|e| AcademicError::database_operation(format!("Failed to save department: {e}")))?;

        Ok(saved.into_department())
    }

    pub async fn get_department_impl(&self, department_id: &str) -> Result<Option<Department>> {
        let result = Departments::find_by_id(department_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query department: {e}")))?;

        Ok(result.map(|m| m.into_department()))
    }

    /// 更新院系楼宇与办公室
    pub async fn update_department_impl(
        &self,
        department_id: &str,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        let Some(model) = Departments::find_by_id(department_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query department: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: departments::ActiveModel = model.into();
        if let Some(building) = update.building {
            active.building = Set(Some(building));
        }
        if let Some(office) = update.office {
            active.office = Set(Some(office));
        }

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to update department: {e}")))?;

        Ok(Some(updated.into_department()))
    }

    /// 专业不存在时创建
    pub async fn ensure_major_impl(&self, major_name: &str, default_hours_req: i32) -> Result<Major> {
        let existing = Majors::find_by_id(major_name.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query majors: {e}")))?;

        if let Some(major) = existing {
            return Ok(major.into_major());
        }

        let created = majors::ActiveModel {
            major_name: Set(major_name.to_string()),
            default_hours_req: Set(default_hours_req),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to create major: {e}")))?;

        Ok(created.into_major())
    }

    /// 关联院系与专业
    pub async fn add_major_to_department_impl(
        &self,
        department_id: &str,
        major_name: &str,
        hours_req: i32,
    ) -> Result<DepartmentMajor> {
        let existing = DepartmentMajors::find()
            .filter(department_majors::Column::DepartmentId.eq(department_id))
            .filter(department_majors::Column::MajorName.eq(major_name))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query department majors: {e}")))?;

        let saved = match existing {
            Some(model) => {
                let mut active: department_majors::ActiveModel = model.into();
                active.hours_req = Set(hours_req);
                active.update(&self.db).await
            }
            None => {
                department_majors::ActiveModel {
                    department_id: Set(department_id.to_string()),
                    major_name: Set(major_name.to_string()),
                    hours_req: Set(hours_req),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| AcademicError::database_operation(format!("Failed to save department major: {e}")))?;

        Ok(saved.into_department_major())
    }

    pub async fn list_department_majors_impl(
        &self,
        department_id: &str,
    ) -> Result<Vec<DepartmentMajor>> {
        let result = DepartmentMajors::find()
            .filter(department_majors::Column::DepartmentId.eq(department_id))
            .order_by_asc(department_majors::Column::MajorName)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query department majors: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_department_major()).collect())
    }

    /// 专业毕业学时要求
    pub async fn get_major_hours_requirement_impl(&self, major_name: &str) -> Result<Option<i32>> {
        let by_department = DepartmentMajors::find()
            .filter(department_majors::Column::MajorName.eq(major_name))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query department majors: {e}")))?;

        if let Some(dm) = by_department {
            return Ok(Some(dm.hours_req));
        }

        let major = Majors::find_by_id(major_name.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query majors: {e}")))?;

        Ok(major.map(|m| m.default_hours_req))
    }

    /// 关联导师与院系，返回是否新增
    pub async fn add_advisor_department_impl(
        &self,
        advisor_id: &str,
        department_id: &str,
    ) -> Result<bool> {
        let existing = AdvisorDepartments::find()
            .filter(advisor_departments::Column::AdvisorId.eq(advisor_id))
            .filter(advisor_departments::Column::DepartmentId.eq(department_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query advisor departments: {e}")))?;

        if existing.is_some() {
            return Ok(false);
        }

        advisor_departments::ActiveModel {
            advisor_id: Set(advisor_id.to_string()),
            department_id: Set(department_id.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademicError::database_operation(format!("Failed to create advisor department: {e}")))?;

        Ok(true)
    }

    pub async fn list_advisor_departments_impl(&self, advisor_id: &str) -> Result<Vec<String>> {
        let result = AdvisorDepartments::find()
            .filter(advisor_departments::Column::AdvisorId.eq(advisor_id))
            .order_by_asc(advisor_departments::Column::DepartmentId)
            .all(&self.db)
            .await
            .map_err(|e| AcademicError::database_operation(format!("Failed to query advisor departments: {e}")))?;

        Ok(result.into_iter().map(|m| m.department_id).collect())
    }
}
