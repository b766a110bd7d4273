//! Link-creation announcements
//!
//! Fire-and-forget: callers log a failed notification and move on.

mod logger;
mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

pub use self::logger::LogNotifier;
pub use self::webhook::WebhookNotifier;

use crate::config::{NotifyConfig, NotifyKind};
use crate::errors::{Result, ShortstatError};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Drops every message.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _message: &str) -> Result<()> {
        Ok(())
    }
}

/// 创建链接时发送的通知内容
pub fn creation_message(code: &str) -> String {
    format!("The system generated a short URL with the ID {}", code)
}

pub struct NotifierFactory;

impl NotifierFactory {
    pub fn create(config: &NotifyConfig) -> Result<Arc<dyn Notifier>> {
        let notifier: Arc<dyn Notifier> = match config.kind {
            NotifyKind::Log => Arc::new(LogNotifier),
            NotifyKind::None => Arc::new(NullNotifier),
            NotifyKind::Webhook => {
                let url = config
                    .webhook_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| ShortstatError::config("notify.webhook_url is not set"))?;
                Arc::new(WebhookNotifier::new(url, config.timeout_ms)?)
            }
        };

        info!("Notifier: {:?}", config.kind);
        Ok(notifier)
    }
}
