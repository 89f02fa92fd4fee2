//! 学生选课实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: String,
    pub course_prefix: String,
    pub course_number: String,
    pub semester: String,
    pub year_taken: i32,
    pub grade: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::StudentId"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> crate::models::courses::entities::Enrollment {
        crate::models::courses::entities::Enrollment {
            id: self.id,
            student_id: self.student_id,
            course_prefix: self.course_prefix,
            course_number: self.course_number,
            semester: self.semester,
            year: self.year_taken,
            grade: self.grade,
        }
    }
}
