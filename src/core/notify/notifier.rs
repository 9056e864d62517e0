use async_trait::async_trait;
use thiserror::Error;

use super::notify_models::{ToastMessage, ToastStatus};

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Nothing is listening on this channel (expired interaction, closed DMs, ...).
    #[error("Channel unreachable: {0}")]
    Unreachable(String),
    #[error("Notification failed: {0}")]
    Failed(String),
}

/// Fire-and-forget status reporting. Callers never wait on an acknowledgment
/// and never see delivery errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, status: ToastStatus, text: &str);
}

/// A single delivery channel for toasts.
#[async_trait]
pub trait ToastChannel: Send + Sync {
    async fn deliver(&self, message: &ToastMessage) -> Result<(), NotifyError>;
}

/// Tries the primary channel and falls back to the secondary one when the
/// primary reports it is unreachable.
pub struct FallbackNotifier<P: ToastChannel, S: ToastChannel> {
    primary: P,
    secondary: S,
}

impl<P: ToastChannel, S: ToastChannel> FallbackNotifier<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl<P: ToastChannel, S: ToastChannel> Notifier for FallbackNotifier<P, S> {
    async fn notify(&self, status: ToastStatus, text: &str) {
        let message = ToastMessage::new(status, text);

        match self.primary.deliver(&message).await {
            Ok(()) => {}
            Err(NotifyError::Unreachable(reason)) => {
                tracing::info!("Toast fallback to notification: {}", reason);
                if let Err(e) = self.secondary.deliver(&message).await {
                    tracing::warn!("Fallback notification failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("Toast delivery failed: {}", e),
        }
    }
}
