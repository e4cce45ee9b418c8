//! Status Notification
//!
//! Hands the rendered notification payload to the transport that talks to the
//! display-management service. One attempt per call: no retries, no session
//! carried between calls.

use async_trait::async_trait;
use tracing::debug;

use crate::config::StatusConfig;
use crate::errors::{Result, StatusError};

// ----------------------------------------------------------------------------
// Transport Trait
// ----------------------------------------------------------------------------

/// Acknowledgement returned by the remote `NotifyStatus` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyAck {
    pub success: bool,
    pub error: Option<String>,
}

impl NotifyAck {
    pub fn accepted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }
}

/// Client for the remote status notification call
#[async_trait]
pub trait StatusTransport: Send + Sync {
    /// Deliver `status` on behalf of the display identified by the two keys
    async fn notify_status(
        &self,
        server_key: &str,
        hardware_key: &str,
        status: &str,
    ) -> Result<NotifyAck>;
}

/// Transport that accepts every notification without sending anything
#[derive(Debug, Clone, Default)]
pub struct NoOpTransport;

#[async_trait]
impl StatusTransport for NoOpTransport {
    async fn notify_status(
        &self,
        _server_key: &str,
        _hardware_key: &str,
        _status: &str,
    ) -> Result<NotifyAck> {
        Ok(NotifyAck::accepted())
    }
}

// ----------------------------------------------------------------------------
// Status Notifier
// ----------------------------------------------------------------------------

/// Sends rendered status payloads with the configured credentials
#[derive(Debug, Clone)]
pub struct StatusNotifier {
    server_key: String,
    hardware_key: String,
}

impl StatusNotifier {
    pub fn new(server_key: impl Into<String>, hardware_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            hardware_key: hardware_key.into(),
        }
    }

    pub fn from_config(config: &StatusConfig) -> Self {
        Self::new(config.server_key.clone(), config.hardware_key.clone())
    }

    /// Deliver `payload` once. A transport error or a negative acknowledgement
    /// is returned to the caller.
    pub async fn notify(&self, payload: &str, transport: &dyn StatusTransport) -> Result<()> {
        let ack = transport
            .notify_status(&self.server_key, &self.hardware_key, payload)
            .await?;

        if !ack.success {
            let reason = ack
                .error
                .unwrap_or_else(|| "service reported failure".to_string());
            return Err(StatusError::Rejected(reason));
        }

        debug!(bytes = payload.len(), "Status notified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingTransport {
        calls: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl StatusTransport for CapturingTransport {
        async fn notify_status(
            &self,
            server_key: &str,
            hardware_key: &str,
            status: &str,
        ) -> Result<NotifyAck> {
            self.calls.lock().unwrap().push((
                server_key.to_string(),
                hardware_key.to_string(),
                status.to_string(),
            ));
            Ok(NotifyAck::accepted())
        }
    }

    struct FixedTransport(Result<NotifyAck>);

    #[async_trait]
    impl StatusTransport for FixedTransport {
        async fn notify_status(
            &self,
            _server_key: &str,
            _hardware_key: &str,
            _status: &str,
        ) -> Result<NotifyAck> {
            match &self.0 {
                Ok(ack) => Ok(ack.clone()),
                Err(err) => Err(StatusError::Transport(err.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_notify_passes_credentials() {
        let transport = CapturingTransport::default();
        let notifier = StatusNotifier::new("server", "hardware");

        notifier.notify("{\"statusDialog\":\"{}\"}", &transport).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "server");
        assert_eq!(calls[0].1, "hardware");
        assert_eq!(calls[0].2, "{\"statusDialog\":\"{}\"}");
    }

    #[tokio::test]
    async fn test_negative_ack_is_rejected() {
        let notifier = StatusNotifier::new("s", "h");

        let transport = FixedTransport(Ok(NotifyAck::rejected("display not authorised")));
        let err = notifier.notify("{}", &transport).await.unwrap_err();
        assert!(matches!(err, StatusError::Rejected(reason) if reason == "display not authorised"));

        let transport = FixedTransport(Ok(NotifyAck { success: false, error: None }));
        assert!(matches!(
            notifier.notify("{}", &transport).await,
            Err(StatusError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_returned() {
        let notifier = StatusNotifier::from_config(&StatusConfig::default());
        let transport = FixedTransport(Err(StatusError::Transport("timed out".to_string())));
        assert!(matches!(
            notifier.notify("{}", &transport).await,
            Err(StatusError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_noop_transport_accepts() {
        let notifier = StatusNotifier::new("s", "h");
        assert!(notifier.notify("{}", &NoOpTransport).await.is_ok());
    }
}
