use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::trace;
use ureq::Agent;

use super::Notifier;
use crate::errors::{Result, ShortstatError};

/// Slack-compatible incoming webhook payload
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// POSTs `{"text": message}` to an incoming-webhook URL.
pub struct WebhookNotifier {
    url: String,
    agent: Agent,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self> {
        url::Url::parse(url)
            .map_err(|e| ShortstatError::config(format!("Invalid webhook URL '{}': {}", url, e)))?;

        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_millis(timeout_ms.max(1))))
            .build()
            .into();

        Ok(Self {
            url: url.to_string(),
            agent,
        })
    }

    /// 同步发送，在 spawn_blocking 中调用
    fn post_sync(agent: Agent, url: String, message: String) -> Result<()> {
        agent
            .post(&url)
            .send_json(WebhookPayload { text: &message })
            .map_err(|e| ShortstatError::notify(format!("Webhook POST to {} failed: {}", url, e)))?;

        trace!("Webhook delivered to {}", url);
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let message = message.to_string();

        tokio::task::spawn_blocking(move || Self::post_sync(agent, url, message))
            .await
            .map_err(|e| ShortstatError::notify(format!("Webhook task failed: {}", e)))?
    }
}
