//! 院系-专业关联实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "department_majors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub department_id: String,
    pub major_name: String,
    pub hours_req: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::DepartmentId"
    )]
    Department,
    #[sea_orm(
        belongs_to = "super::majors::Entity",
        from = "Column::MajorName",
        to = "super::majors::Column::MajorName"
    )]
    Major,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::majors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Major.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_department_major(self) -> crate::models::departments::entities::DepartmentMajor {
        crate::models::departments::entities::DepartmentMajor {
            department_id: self.department_id,
            major_name: self.major_name,
            hours_req: self.hours_req,
        }
    }
}
