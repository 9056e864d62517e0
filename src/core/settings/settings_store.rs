use super::settings_models::{DocBinding, Session};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Document bindings follow the user across installations, so implementations
/// are expected to live somewhere shared.
#[async_trait]
pub trait BindingStore: Send + Sync {
    async fn get_binding(&self, user_id: u64) -> Result<Option<DocBinding>, StoreError>;
    async fn save_binding(&self, user_id: u64, binding: DocBinding) -> Result<(), StoreError>;
}

/// Credentials stay local to the running bot.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session(&self, user_id: u64) -> Result<Option<Session>, StoreError>;
    async fn save_session(&self, user_id: u64, session: Session) -> Result<(), StoreError>;
    /// Removing a session that does not exist is not an error.
    async fn remove_session(&self, user_id: u64) -> Result<(), StoreError>;
}
