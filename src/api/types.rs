use serde::{Deserialize, Serialize};

/// `PUT /generate`, `POST /links`
#[derive(Debug, Deserialize)]
pub struct CreateLinkBody {
    pub long: String,
}

/// `DELETE /delete`
#[derive(Debug, Deserialize)]
pub struct DeleteLinkBody {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub platform: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthCacheCheck {
    pub status: String,
    pub cache_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
    pub cache: HealthCacheCheck,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub background_tasks: usize,
    pub checks: HealthChecks,
    pub response_time_ms: u64,
}
