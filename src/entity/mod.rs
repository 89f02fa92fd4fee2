//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod advisor_departments;
pub mod advisors;
pub mod courses;
pub mod department_majors;
pub mod departments;
pub mod instructor_courses;
pub mod instructors;
pub mod majors;
pub mod operation_logs;
pub mod staff;
pub mod student_courses;
pub mod students;
pub mod users;
