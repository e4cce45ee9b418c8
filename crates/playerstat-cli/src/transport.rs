//! Transports available to the CLI

use async_trait::async_trait;
use tracing::info;

use playerstat_core::{NotifyAck, Result, StatusTransport};

/// Logs the payload it would send instead of contacting the service.
///
/// Used until a real display-management client is wired in; the endpoint is
/// recorded so the log shows where the payload was headed.
#[derive(Debug, Clone)]
pub struct DryRunTransport {
    endpoint: String,
}

impl DryRunTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl StatusTransport for DryRunTransport {
    async fn notify_status(
        &self,
        _server_key: &str,
        hardware_key: &str,
        status: &str,
    ) -> Result<NotifyAck> {
        info!(
            endpoint = %self.endpoint,
            hardware_key,
            "notifyStatus (dry run): {}",
            status
        );
        Ok(NotifyAck::accepted())
    }
}
