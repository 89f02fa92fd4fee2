//! 专业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "majors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub major_name: String,
    pub default_hours_req: i32,
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
    pub fn into_major(self) -> crate::models::departments::entities::Major {
        crate::models::departments::entities::Major {
            major_name: self.major_name,
            default_hours_req: self.default_hours_req,
        }
    }
}
