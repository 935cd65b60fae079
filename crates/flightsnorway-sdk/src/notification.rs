//! Out-of-band push notification channel.
//!
//! The selection workflow only opens the channel and logs the resulting
//! address; nothing it does depends on the outcome.

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};

use crate::error::SdkError;
use crate::subjects::PushSubjects;

/// Opens a push channel and reports the address senders should target.
pub trait NotificationChannel: Send + Sync + 'static {
    /// Open the channel. Resolves once with the channel address.
    fn open(&self) -> BoxFuture<'static, Result<String, SdkError>>;
}

/// [`NotificationChannel`] over NATS.
///
/// Opening connects to the server, subscribes to the device's push subject
/// and spawns a task that logs every pushed payload for as long as the
/// connection stays up.
#[derive(Debug, Clone)]
pub struct NatsNotificationChannel {
    nats_url: String,
    device_id: String,
}

impl NatsNotificationChannel {
    /// Create a channel for `device_id` on the NATS server at `nats_url`.
    pub fn new(nats_url: &str, device_id: &str) -> Self {
        Self {
            nats_url: nats_url.to_string(),
            device_id: device_id.to_string(),
        }
    }

    /// The subject this channel listens on.
    pub fn subject(&self) -> String {
        PushSubjects::device(&self.device_id)
    }
}

impl NotificationChannel for NatsNotificationChannel {
    fn open(&self) -> BoxFuture<'static, Result<String, SdkError>> {
        let nats_url = self.nats_url.clone();
        let subject = self.subject();

        async move {
            let client = async_nats::connect(nats_url.as_str()).await?;
            let mut subscription = client.subscribe(subject.clone()).await?;

            let listening_on = subject.clone();
            tokio::spawn(async move {
                // Keep the client alive with the subscription.
                let _client = client;
                while let Some(message) = subscription.next().await {
                    let text = String::from_utf8_lossy(&message.payload);
                    tracing::info!(subject = %listening_on, payload = %text, "push notification");
                }
                tracing::debug!(subject = %listening_on, "push subscription closed");
            });

            Ok(subject)
        }
        .boxed()
    }
}

/// [`NotificationChannel`] that never connects anywhere.
///
/// Used when push notifications are disabled. Opening always fails with
/// [`SdkError::PushDisabled`].
#[derive(Debug, Clone, Default)]
pub struct DisabledNotificationChannel;

impl NotificationChannel for DisabledNotificationChannel {
    fn open(&self) -> BoxFuture<'static, Result<String, SdkError>> {
        futures::future::ready(Err(SdkError::PushDisabled)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nats_channel_subject_follows_device() {
        let channel = NatsNotificationChannel::new("nats://localhost:4222", "phone-7");
        assert_eq!(channel.subject(), "flightsnorway.v1.push.phone-7");
    }

    #[tokio::test]
    async fn disabled_channel_reports_push_disabled() {
        let err = DisabledNotificationChannel.open().await.unwrap_err();
        assert!(matches!(err, SdkError::PushDisabled));
    }
}
