//! 开课实体（instructor_id 为空表示待定）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "instructor_courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub instructor_id: Option<String>,
    pub course_prefix: String,
    pub course_number: String,
    pub semester: String,
    pub year_taught: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_section(self) -> crate::models::courses::entities::CourseSection {
        crate::models::courses::entities::CourseSection {
            id: self.id,
            instructor_id: self.instructor_id,
            course_prefix: self.course_prefix,
            course_number: self.course_number,
            semester: self.semester,
            year: self.year_taught,
        }
    }
}
