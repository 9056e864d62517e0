// In-memory settings store shared by the core unit tests.
//
// Both traits are implemented on one struct so a single instance can back the
// binding service, the session service, and the clipper at the same time, the
// same way the JSON stores do at runtime.

use super::settings_models::{DocBinding, Session};
use super::settings_store::{BindingStore, SessionStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;

#[derive(Default)]
pub struct InMemorySettingsStore {
    bindings: DashMap<u64, DocBinding>,
    sessions: DashMap<u64, Session>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(self, user_id: u64, doc_id: &str) -> Self {
        let url = format!("https://docs.google.com/document/d/{}/edit", doc_id);
        self.bindings.insert(user_id, DocBinding::new(url, doc_id));
        self
    }

    pub fn with_token(self, user_id: u64, token: &str) -> Self {
        self.sessions.insert(user_id, Session::new(token));
        self
    }

    pub fn token(&self, user_id: u64) -> Option<String> {
        self.sessions.get(&user_id).map(|s| s.access_token.clone())
    }
}

#[async_trait]
impl BindingStore for InMemorySettingsStore {
    async fn get_binding(&self, user_id: u64) -> Result<Option<DocBinding>, StoreError> {
        Ok(self.bindings.get(&user_id).map(|b| b.clone()))
    }

    async fn save_binding(&self, user_id: u64, binding: DocBinding) -> Result<(), StoreError> {
        self.bindings.insert(user_id, binding);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemorySettingsStore {
    async fn get_session(&self, user_id: u64) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.get(&user_id).map(|s| s.clone()))
    }

    async fn save_session(&self, user_id: u64, session: Session) -> Result<(), StoreError> {
        self.sessions.insert(user_id, session);
        Ok(())
    }

    async fn remove_session(&self, user_id: u64) -> Result<(), StoreError> {
        self.sessions.remove(&user_id);
        Ok(())
    }
}
