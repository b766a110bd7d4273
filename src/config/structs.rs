use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortstatError};

/// 应用配置（启动时加载一次，按引用传入各组件）
///
/// 优先级：ENV > config.toml > 默认值
/// ENV 前缀：SS，分隔符：__
/// 示例：SS__SERVER__PORT=9999
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// A missing file is fine. A malformed file or an unparsable variable is
    /// an error.
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix("SS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the services cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.links.code_length == 0 || self.links.code_length > 64 {
            return Err(ShortstatError::config(format!(
                "links.code_length must be between 1 and 64, got {}",
                self.links.code_length
            )));
        }
        if self.links.max_generation_attempts == 0 {
            return Err(ShortstatError::config(
                "links.max_generation_attempts must be at least 1",
            ));
        }
        if self.links.list_limit == 0 {
            return Err(ShortstatError::config("links.list_limit must be at least 1"));
        }
        if self.cache.timeout_ms == 0 {
            return Err(ShortstatError::config("cache.timeout_ms must be at least 1"));
        }
        if self.stats.max_in_flight == 0 {
            return Err(ShortstatError::config("stats.max_in_flight must be at least 1"));
        }
        if self.database.database_url.is_empty() {
            return Err(ShortstatError::database_config("database.database_url is empty"));
        }
        if self.notify.kind == NotifyKind::Webhook
            && self.notify.webhook_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(ShortstatError::config(
                "notify.kind = \"webhook\" requires notify.webhook_url",
            ));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlite://, mysql://, postgres:// or memory://
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// Deadline for a single store call, in seconds.
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    #[default]
    Memory,
    Redis,
    Null,
}

/// 缓存系统配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    #[serde(default)]
    pub cache_type: CacheKind,
    /// Expiry of a cached code → URL entry, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub default_ttl: u64,
    /// Deadline for a single cache call, in milliseconds. An elapsed call
    /// counts as a miss.
    #[serde(default = "default_cache_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_capacity")]
    pub max_capacity: u64,
}

/// 短链接生成与列表配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_min_url_length")]
    pub min_url_length: usize,
    #[serde(default = "default_list_limit")]
    pub list_limit: u64,
    /// How many codes to try when the store reports a duplicate key.
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
}

/// 统计记录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Record resolve-path events as detached background tasks.
    #[serde(default = "default_stats_detached")]
    pub detached: bool,
    #[serde(default = "default_record_timeout_ms")]
    pub record_timeout_ms: u64,
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    #[default]
    Log,
    Webhook,
    None,
}

/// 创建通知配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub kind: NotifyKind,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_notify_timeout_ms")]
    pub timeout_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://shortstat.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    5
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_timeout_ms() -> u64 {
    500
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_redis_key_prefix() -> String {
    "shortstat:".to_string()
}

fn default_memory_capacity() -> u64 {
    10000
}

fn default_code_length() -> usize {
    8
}

fn default_min_url_length() -> usize {
    15
}

fn default_list_limit() -> u64 {
    100
}

fn default_max_generation_attempts() -> u32 {
    3
}

fn default_stats_detached() -> bool {
    true
}

fn default_record_timeout_ms() -> u64 {
    5000
}

fn default_max_in_flight() -> usize {
    1024
}

fn default_notify_timeout_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheKind::default(),
            default_ttl: default_cache_ttl(),
            timeout_ms: default_cache_timeout_ms(),
            redis: RedisConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_redis_key_prefix(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_memory_capacity(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            min_url_length: default_min_url_length(),
            list_limit: default_list_limit(),
            max_generation_attempts: default_max_generation_attempts(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            detached: default_stats_detached(),
            record_timeout_ms: default_record_timeout_ms(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            kind: NotifyKind::default(),
            webhook_url: None,
            timeout_ms: default_notify_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
