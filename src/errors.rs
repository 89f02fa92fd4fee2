//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_academic_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum AcademicError {
            $($variant(String),)*
        }

        impl AcademicError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AcademicError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AcademicError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AcademicError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AcademicError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AcademicError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_academic_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Conflict("E007", "Resource Conflict"),
    Serialization("E008", "Serialization Error"),
    DateParse("E009", "Date Parse Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
    Import("E012", "Import Error"),
}

impl AcademicError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AcademicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AcademicError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AcademicError {
    fn from(err: sea_orm::DbErr) -> Self {
        AcademicError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AcademicError {
    fn from(err: std::io::Error) -> Self {
        AcademicError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AcademicError {
    fn from(err: serde_json::Error) -> Self {
        AcademicError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AcademicError {
    fn from(err: chrono::ParseError) -> Self {
        AcademicError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AcademicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AcademicError::database_config("test").code(), "E001");
        assert_eq!(AcademicError::validation("test").code(), "E005");
        assert_eq!(AcademicError::conflict("test").code(), "E007");
        assert_eq!(AcademicError::authentication("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AcademicError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            AcademicError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = AcademicError::validation("Invalid grade");
        assert_eq!(err.message(), "Invalid grade");
    }

    #[test]
    fn test_format_simple() {
        let err = AcademicError::conflict("Course already exists");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Conflict"));
        assert!(formatted.contains("Course already exists"));
    }

    #[test]
    fn test_from_chrono_parse_error() {
        let parse_err = chrono::NaiveDate::parse_from_str("not-a-date", "%Y-%m-%d").unwrap_err();
        let err: AcademicError = parse_err.into();
        assert_eq!(err.code(), "E009");
    }
}
