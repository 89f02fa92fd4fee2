//! 院系实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub department_id: String,
    pub building: Option<String>,
    pub office: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::department_majors::Entity")]
    DepartmentMajors,
}

impl Related<super::department_majors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepartmentMajors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_department(self) -> crate::models::departments::entities::Department {
        crate::models::departments::entities::Department {
            department_id: self.department_id,
            building: self.building,
            office: self.office,
        }
    }
}
