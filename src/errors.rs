use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortstatError {
    Validation(String),
    NotFound(String),
    DuplicateKey(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    CacheConnection(String),
    Timeout(String),
    Notify(String),
    Serialization(String),
    Config(String),
}

impl ShortstatError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortstatError::Validation(_) => "E001",
            ShortstatError::NotFound(_) => "E002",
            ShortstatError::DuplicateKey(_) => "E003",
            ShortstatError::DatabaseConfig(_) => "E004",
            ShortstatError::DatabaseConnection(_) => "E005",
            ShortstatError::DatabaseOperation(_) => "E006",
            ShortstatError::CacheConnection(_) => "E007",
            ShortstatError::Timeout(_) => "E008",
            ShortstatError::Notify(_) => "E009",
            ShortstatError::Serialization(_) => "E010",
            ShortstatError::Config(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortstatError::Validation(_) => "Validation Error",
            ShortstatError::NotFound(_) => "Resource Not Found",
            ShortstatError::DuplicateKey(_) => "Duplicate Key",
            ShortstatError::DatabaseConfig(_) => "Database Configuration Error",
            ShortstatError::DatabaseConnection(_) => "Database Connection Error",
            ShortstatError::DatabaseOperation(_) => "Database Operation Error",
            ShortstatError::CacheConnection(_) => "Cache Connection Error",
            ShortstatError::Timeout(_) => "Timeout",
            ShortstatError::Notify(_) => "Notification Error",
            ShortstatError::Serialization(_) => "Serialization Error",
            ShortstatError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortstatError::Validation(msg)
            | ShortstatError::NotFound(msg)
            | ShortstatError::DuplicateKey(msg)
            | ShortstatError::DatabaseConfig(msg)
            | ShortstatError::DatabaseConnection(msg)
            | ShortstatError::DatabaseOperation(msg)
            | ShortstatError::CacheConnection(msg)
            | ShortstatError::Timeout(msg)
            | ShortstatError::Notify(msg)
            | ShortstatError::Serialization(msg)
            | ShortstatError::Config(msg) => msg,
        }
    }

    /// A store, cache or notifier could not be reached or failed mid-operation.
    ///
    /// Fatal for Link Store calls on the critical path, swallowed everywhere else.
    pub fn is_dependency(&self) -> bool {
        matches!(
            self,
            ShortstatError::DatabaseConnection(_)
                | ShortstatError::DatabaseOperation(_)
                | ShortstatError::CacheConnection(_)
                | ShortstatError::Timeout(_)
                | ShortstatError::Notify(_)
        )
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            ShortstatError::Validation(_) => StatusCode::BAD_REQUEST,
            ShortstatError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortstatError::DuplicateKey(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortstatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortstatError {}

// 便捷的构造函数
impl ShortstatError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortstatError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortstatError::NotFound(msg.into())
    }

    pub fn duplicate_key<T: Into<String>>(msg: T) -> Self {
        ShortstatError::DuplicateKey(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortstatError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortstatError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortstatError::DatabaseOperation(msg.into())
    }

    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        ShortstatError::CacheConnection(msg.into())
    }

    pub fn timeout<T: Into<String>>(msg: T) -> Self {
        ShortstatError::Timeout(msg.into())
    }

    pub fn notify<T: Into<String>>(msg: T) -> Self {
        ShortstatError::Notify(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortstatError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortstatError::Config(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ShortstatError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                ShortstatError::DatabaseConnection(err.to_string())
            }
            _ => ShortstatError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for ShortstatError {
    fn from(err: redis::RedisError) -> Self {
        ShortstatError::CacheConnection(err.to_string())
    }
}

impl From<serde_json::Error> for ShortstatError {
    fn from(err: serde_json::Error) -> Self {
        ShortstatError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for ShortstatError {
    fn from(err: config::ConfigError) -> Self {
        ShortstatError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortstatError>;
