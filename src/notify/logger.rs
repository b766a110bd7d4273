use async_trait::async_trait;
use tracing::info;

use super::Notifier;
use crate::errors::Result;

/// Writes the announcement to the application log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        info!(target: "shortstat::notify", "{}", message);
        Ok(())
    }
}
