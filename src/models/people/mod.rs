//! 学生、教师、导师与院系职员档案

pub mod entities;
pub mod requests;
pub mod responses;
