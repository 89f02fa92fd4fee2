//! 教师档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "instructors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    #[sea_orm(unique)]
    pub instructor_id: String,
    pub phone: Option<String>,
    pub department_id: Option<String>,
    pub hired_semester: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_instructor(self) -> crate::models::people::entities::Instructor {
        crate::models::people::entities::Instructor {
            user_id: self.user_id,
            instructor_id: self.instructor_id,
            phone: self.phone,
            department_id: self.department_id,
            hired_semester: self.hired_semester,
        }
    }
}
