use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;

use super::clip_models::{insertion_index, AppendPlan, ClipRequest};
use crate::core::notify::{Notifier, ToastStatus};
use crate::core::settings::{BindingStore, SessionStore, StoreError};

pub const SUCCESS_MESSAGE: &str = "Appended to Google Doc!";
const GENERIC_FAILURE: &str = "Failed to append";

/// Substrings Google uses when it rejects a credential.
const AUTH_FAILURE_MARKERS: [&str; 2] = ["401", "Invalid Credentials"];

/// Failure reported by the Docs API or the transport underneath it.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Non-success response. `message` is Google's own error message when it
    /// sent one, otherwise a description that includes the status code.
    #[error("{message}")]
    Remote { status: Option<u16>, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("Document has no content")]
    EmptyDocument,
}

impl DocsError {
    /// Whether this failure means the credential is expired or invalid.
    pub fn is_auth_failure(&self) -> bool {
        if let DocsError::Remote {
            status: Some(401), ..
        } = self
        {
            return true;
        }

        let message = self.to_string();
        AUTH_FAILURE_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
    }
}

/// Why a clip was not appended. The display text is what the user sees.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("No Google Doc configured")]
    NoDocument,
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Session expired. Please sign in again.")]
    SessionExpired,
    #[error("{0}")]
    Remote(String),
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// The two Google Docs calls an append needs.
#[async_trait]
pub trait DocumentsApi: Send + Sync {
    /// End offset of the last structural element in the document body.
    async fn last_block_end_index(&self, doc_id: &str, token: &str) -> Result<i64, DocsError>;

    /// Sends the insert and the link style as one ordered batch update.
    async fn apply_append(
        &self,
        doc_id: &str,
        token: &str,
        plan: &AppendPlan,
    ) -> Result<(), DocsError>;
}

/// Appends clips to the user's bound document.
///
/// Appends to the same document are serialized so two quick clips never
/// compute their insertion point from the same stale document length.
pub struct ClipperService<D: DocumentsApi, B: BindingStore, S: SessionStore> {
    docs: D,
    bindings: Arc<B>,
    sessions: Arc<S>,
    doc_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<D: DocumentsApi, B: BindingStore, S: SessionStore> ClipperService<D, B, S> {
    pub fn new(docs: D, bindings: Arc<B>, sessions: Arc<S>) -> Self {
        Self {
            docs,
            bindings,
            sessions,
            doc_locks: DashMap::new(),
        }
    }

    /// Appends the clip and tells the user how it went, success or failure.
    pub async fn append<N>(
        &self,
        user_id: u64,
        request: &ClipRequest,
        notifier: &N,
    ) -> Result<(), ClipError>
    where
        N: Notifier + ?Sized,
    {
        let outcome = self.try_append(user_id, request).await;

        match &outcome {
            Ok(()) => notifier.notify(ToastStatus::Success, SUCCESS_MESSAGE).await,
            Err(e) => {
                tracing::error!(user_id, "Error appending to doc: {}", e);
                notifier.notify(ToastStatus::Error, &e.to_string()).await;
            }
        }

        outcome
    }

    async fn try_append(&self, user_id: u64, request: &ClipRequest) -> Result<(), ClipError> {
        let binding = self
            .bindings
            .get_binding(user_id)
            .await?
            .ok_or(ClipError::NoDocument)?;

        let session = self
            .sessions
            .get_session(user_id)
            .await?
            .filter(|s| !s.access_token.is_empty())
            .ok_or(ClipError::NotSignedIn)?;

        let lock = Arc::clone(&self.doc_locks.entry(binding.doc_id.clone()).or_default());
        let result = {
            let _guard = lock.lock().await;
            self.append_at_end(&binding.doc_id, &session.access_token, request)
                .await
        };
        self.release_doc_lock(&binding.doc_id, lock);

        match result {
            Ok(plan) => {
                tracing::info!(
                    user_id,
                    doc_id = %binding.doc_id,
                    index = plan.index,
                    chars = plan.text.chars().count(),
                    "Appended clip"
                );
                Ok(())
            }
            Err(e) if e.is_auth_failure() => {
                tracing::info!(user_id, "Google rejected the token ({}), signing out", e);
                if let Err(store_err) = self.sessions.remove_session(user_id).await {
                    tracing::warn!(user_id, "Failed to discard expired token: {}", store_err);
                }
                Err(ClipError::SessionExpired)
            }
            Err(e) => {
                let message = e.to_string();
                if message.trim().is_empty() {
                    Err(ClipError::Remote(GENERIC_FAILURE.to_string()))
                } else {
                    Err(ClipError::Remote(message))
                }
            }
        }
    }

    /// Drops the document's lock entry unless another append still holds a
    /// reference to it. Cloning out of the map happens under the same shard
    /// lock `remove_if` takes, so the count cannot grow during the check.
    fn release_doc_lock(&self, doc_id: &str, lock: Arc<Mutex<()>>) {
        self.doc_locks.remove_if(doc_id, |_, held| {
            Arc::ptr_eq(held, &lock) && Arc::strong_count(held) == 2
        });
    }

    async fn append_at_end(
        &self,
        doc_id: &str,
        token: &str,
        request: &ClipRequest,
    ) -> Result<AppendPlan, DocsError> {
        let end = self.docs.last_block_end_index(doc_id, token).await?;
        let plan = AppendPlan::new(request, insertion_index(end));
        self.docs.apply_append(doc_id, token, &plan).await?;
        Ok(plan)
    }
}
