use std::sync::Arc;

use super::settings_models::{extract_doc_id, DocBinding};
use super::settings_store::{BindingStore, StoreError};

/// Errors shown inline by the `/gdoc bind` command. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("Please enter a URL")]
    EmptyUrl,
    #[error("Invalid Google Docs URL")]
    InvalidUrl,
    #[error("Failed to save: {0}")]
    Store(#[from] StoreError),
}

/// Binds each user to the Google Doc their clips are appended to.
pub struct BindingService<B: BindingStore> {
    store: Arc<B>,
}

impl<B: BindingStore> BindingService<B> {
    pub fn new(store: Arc<B>) -> Self {
        Self { store }
    }

    /// Parses a pasted document URL and stores the binding, replacing any previous one.
    pub async fn bind(&self, user_id: u64, raw_url: &str) -> Result<DocBinding, BindingError> {
        let url = raw_url.trim();
        if url.is_empty() {
            return Err(BindingError::EmptyUrl);
        }

        let doc_id = extract_doc_id(url).ok_or(BindingError::InvalidUrl)?;
        let binding = DocBinding::new(url, doc_id);

        self.store.save_binding(user_id, binding.clone()).await?;
        tracing::info!(user_id, doc_id = %binding.doc_id, "Bound Google Doc");

        Ok(binding)
    }

    pub async fn current(&self, user_id: u64) -> Result<Option<DocBinding>, BindingError> {
        Ok(self.store.get_binding(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::in_memory::InMemorySettingsStore;

    #[tokio::test]
    async fn test_bind_stores_url_and_id() {
        let service = BindingService::new(Arc::new(InMemorySettingsStore::new()));

        let binding = service
            .bind(1, "  https://docs.google.com/document/d/ABC123/edit  ")
            .await
            .unwrap();

        assert_eq!(binding.doc_id, "ABC123");
        assert_eq!(binding.doc_url, "https://docs.google.com/document/d/ABC123/edit");

        let current = service.current(1).await.unwrap().unwrap();
        assert_eq!(current.doc_id, "ABC123");
    }

    #[tokio::test]
    async fn test_bind_rejects_empty_input() {
        let service = BindingService::new(Arc::new(InMemorySettingsStore::new()));

        let err = service.bind(1, "   ").await.unwrap_err();
        assert!(matches!(err, BindingError::EmptyUrl));
        assert_eq!(err.to_string(), "Please enter a URL");
        assert!(service.current(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bind_rejects_url_without_document_segment() {
        let service = BindingService::new(Arc::new(InMemorySettingsStore::new()));

        let err = service
            .bind(1, "https://example.com/some/page")
            .await
            .unwrap_err();
        assert!(matches!(err, BindingError::InvalidUrl));
        assert_eq!(err.to_string(), "Invalid Google Docs URL");
    }

    #[tokio::test]
    async fn test_rebinding_overwrites_previous_document() {
        let service = BindingService::new(Arc::new(InMemorySettingsStore::new()));

        service
            .bind(1, "https://docs.google.com/document/d/FIRST/edit")
            .await
            .unwrap();
        service
            .bind(1, "https://docs.google.com/document/d/SECOND/edit")
            .await
            .unwrap();

        assert_eq!(service.current(1).await.unwrap().unwrap().doc_id, "SECOND");
    }
}
