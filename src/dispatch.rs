use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Relay rejected the notification with status {0}")]
    Relay(reqwest::StatusCode),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Outbound channel for rendered reminder messages.
///
/// Delivery is at-most-once and best-effort: callers log a failure and move
/// on, they never retry.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync + 'static {
    async fn send(
        &self,
        message: &str,
        phone_number: Option<&str>,
    ) -> Result<(), DispatchError>;
}

/// Sends messages through the external SMS relay endpoint.
pub struct SmsRelayDispatcher {
    client: reqwest::Client,
    relay_url: String,
}

impl SmsRelayDispatcher {
    pub fn new(relay_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, relay_url })
    }
}

#[async_trait]
impl NotificationDispatcher for SmsRelayDispatcher {
    async fn send(
        &self,
        message: &str,
        phone_number: Option<&str>,
    ) -> Result<(), DispatchError> {
        let Some(number) = phone_number else {
            // No destination configured; the reminder still counts as fired.
            return Ok(());
        };

        let params = [("number", number), ("message", message)];
        let response = self
            .client
            .post(&self.relay_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DispatchError::Relay(response.status()));
        }

        log::info!("Notification delivered to relay. [number = {}]", number);
        Ok(())
    }
}
