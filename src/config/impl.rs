use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 命令行参数覆盖项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database_url: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(&ConfigOverrides::default())
    }

    /// 加载配置并应用命令行覆盖
    pub fn load_with(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 内置默认值，保证没有配置文件时也能启动
            .set_default("app.system_name", "Academic Management System")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "warn")?
            .set_default("database.url", "sqlite://academic_management.db?mode=rwc")?
            .set_default("database.pool_size", 4)?
            .set_default("database.timeout", 30)?
            .set_default("argon2.memory_cost", 19456)?
            .set_default("argon2.time_cost", 2)?
            .set_default("argon2.parallelism", 1)?
            .set_default("seed.admin_username", "SA01")?
            .set_default("seed.default_password", "password")?
            .set_default("academic.max_instructor_credits", 12)?
            .set_default("academic.assumed_course_credits", 3)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            );

        // 命令行指定的配置文件必须存在
        if let Some(path) = &overrides.config_file {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        // 最后加载环境变量覆盖
        builder = builder.add_source(
            Environment::with_prefix("ACADEMIC")
                .separator("__")
                .try_parsing(true),
        );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("seed.admin_username", std::env::var("ADMIN_USERNAME").ok())?
            .set_override_option("database.url", overrides.database_url.clone())?
            .set_override_option("app.log_level", overrides.log_level.clone())?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        if app_config.academic.assumed_course_credits == 0 {
            return Err(ConfigError::Message(
                "academic.assumed_course_credits must be greater than 0".to_string(),
            ));
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        Self::init_with(&ConfigOverrides::default())
    }

    /// 使用命令行覆盖项初始化配置
    pub fn init_with(overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        let config = Self::load_with(overrides)?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let config = AppConfig::load().unwrap();
        assert!(!config.database.url.is_empty());
        assert!(config.database.pool_size > 0);
        assert!(config.academic.assumed_course_credits > 0);
    }

    #[test]
    fn test_database_url_override() {
        let overrides = ConfigOverrides {
            database_url: Some("sqlite://override.db?mode=rwc".to_string()),
            ..Default::default()
        };
        let config = AppConfig::load_with(&overrides).unwrap();
        assert_eq!(config.database.url, "sqlite://override.db?mode=rwc");
    }

    #[test]
    fn test_missing_explicit_config_file_fails() {
        let overrides = ConfigOverrides {
            config_file: Some(PathBuf::from("/nonexistent/academic-records.toml")),
            ..Default::default()
        };
        assert!(AppConfig::load_with(&overrides).is_err());
    }
}
