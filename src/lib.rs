//! academic-records - 学籍与成绩管理系统
//!
//! 基于 SeaORM 与 SQLite 的多角色教务记录管理，提供命令行交互界面。
//!
//! # 架构
//! - `config`: 配置管理
//! - `console`: 交互式控制台
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod console;
pub mod entity;
pub mod errors;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
