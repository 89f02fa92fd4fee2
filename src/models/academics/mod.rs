//! 学期与成绩等学术基础类型

pub mod grade;
pub mod term;

pub use grade::Grade;
pub use term::{Semester, Term};
