//! 业务数据模型
//!
//! 与 `entity` 中的数据库实体分离，存储层负责两者之间的转换。

pub mod academics;
pub mod audit;
pub mod courses;
pub mod departments;
pub mod people;
pub mod users;
