use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub argon2: Argon2Config,
    pub seed: SeedConfig,
    pub academic: AcademicConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL 或 .db 文件路径
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// Argon2 哈希参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32, // KiB
    pub time_cost: u32,
    pub parallelism: u32,
}

/// 初始数据配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub admin_username: String,
    #[serde(skip_serializing, default)] // 不输出到日志
    pub default_password: String,
}

/// 教务规则配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicConfig {
    pub max_instructor_credits: u32, // 教师单学期最大学分
    pub assumed_course_credits: u32, // 目标 GPA 推算时假定的单门课程学分
}
