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
macro_rules! define_peergroups_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum PeerGroupsError {
            $($variant(String),)*
        }

        impl PeerGroupsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(PeerGroupsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PeerGroupsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(PeerGroupsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl PeerGroupsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PeerGroupsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_peergroups_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    StoreOperation("E004", "Record Store Error"),
    StorePluginNotFound("E005", "Record Store Backend Not Found"),
    Serialization("E006", "Serialization Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    PartialFailure("E010", "Partial Failure"),
    DateParse("E011", "Date Parse Error"),
    Config("E012", "Configuration Error"),
    FileOperation("E013", "File Operation Error"),
}

impl PeerGroupsError {
    /// 是否为预期内的业务失败（调用方应向用户展示提示，而非视为系统故障）
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            PeerGroupsError::Validation(_) | PeerGroupsError::NotFound(_)
        )
    }

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

impl fmt::Display for PeerGroupsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PeerGroupsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PeerGroupsError {
    fn from(err: sea_orm::DbErr) -> Self {
        PeerGroupsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PeerGroupsError {
    fn from(err: std::io::Error) -> Self {
        PeerGroupsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PeerGroupsError {
    fn from(err: serde_json::Error) -> Self {
        PeerGroupsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PeerGroupsError {
    fn from(err: chrono::ParseError) -> Self {
        PeerGroupsError::DateParse(err.to_string())
    }
}

impl From<config::ConfigError> for PeerGroupsError {
    fn from(err: config::ConfigError) -> Self {
        PeerGroupsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PeerGroupsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PeerGroupsError::database_config("test").code(), "E001");
        assert_eq!(PeerGroupsError::store_operation("test").code(), "E004");
        assert_eq!(PeerGroupsError::validation("test").code(), "E007");
        assert_eq!(PeerGroupsError::not_found("test").code(), "E008");
        assert_eq!(PeerGroupsError::partial_failure("test").code(), "E010");
        assert_eq!(PeerGroupsError::date_parse("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            PeerGroupsError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            PeerGroupsError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_expected_failures() {
        assert!(PeerGroupsError::not_found("membership").is_expected());
        assert!(PeerGroupsError::validation("capacity").is_expected());
        assert!(!PeerGroupsError::store_operation("timeout").is_expected());
        assert!(!PeerGroupsError::partial_failure("group 2").is_expected());
    }

    #[test]
    fn test_format_simple() {
        let err = PeerGroupsError::validation("capacity must be at least 1");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("capacity must be at least 1"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: PeerGroupsError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E006");
    }
}
