//! 操作审计日志

pub mod entities;
pub mod requests;
