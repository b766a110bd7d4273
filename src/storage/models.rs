use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 短链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn new(code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            original_url: original_url.into(),
            created_at: Utc::now(),
        }
    }
}

/// 来源平台
///
/// The service never detects this; callers pass it explicitly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    #[default]
    Unknown,
    Twitter,
    Facebook,
    Instagram,
    Linkedin,
    Reddit,
    Youtube,
    Other,
}

impl Platform {
    /// 从存储的字符串解析，未知值回落到 `Unknown`
    pub fn parse_lossy(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// 一次访问/创建事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub id: String,
    pub link_code: String,
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
}

impl Stats {
    pub fn new(link_code: impl Into<String>, platform: Platform) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            link_code: link_code.into(),
            platform,
            created_at: Utc::now(),
        }
    }
}

/// 带统计事件的链接（概览视图）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkWithStats {
    #[serde(flatten)]
    pub link: Link,
    pub stats: Vec<Stats>,
}
