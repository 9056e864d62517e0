use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::RwLock;

use crate::core::settings::{BindingStore, DocBinding, Session, SessionStore, StoreError};

/// JSON file holding one record per user: `{ "<user_id>": { ... } }`.
///
/// The whole map is cached in memory and rewritten on every change.
pub struct JsonKeyValueStore<T> {
    path: PathBuf,
    cache: RwLock<HashMap<u64, T>>,
}

/// Document bindings (`bindings.json`).
pub type JsonBindingStore = JsonKeyValueStore<DocBinding>;

/// Google sessions (`sessions.json`).
pub type JsonSessionStore = JsonKeyValueStore<Session>;

impl<T> JsonKeyValueStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Loads the file if it exists, otherwise starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let map = if fs::try_exists(&path).await? {
            let text = fs::read_to_string(&path).await?;
            if text.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            HashMap::new()
        };

        tracing::debug!("Loaded {} record(s) from {}", map.len(), path.display());

        Ok(Self {
            path,
            cache: RwLock::new(map),
        })
    }

    async fn get(&self, user_id: u64) -> Option<T> {
        let cache = self.cache.read().await;
        cache.get(&user_id).cloned()
    }

    /// Applies `change` to a copy of the map, writes the copy to disk, and only
    /// then swaps it into the cache. The write guard is held across the file
    /// write so concurrent saves reach the disk in the order they change the map.
    async fn update<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut HashMap<u64, T>) -> bool,
    {
        let mut cache = self.cache.write().await;
        let mut next = (*cache).clone();
        if !change(&mut next) {
            return Ok(());
        }

        self.persist(&next).await?;
        *cache = next;
        Ok(())
    }

    async fn put(&self, user_id: u64, value: T) -> Result<(), StoreError> {
        self.update(|map| {
            map.insert(user_id, value);
            true
        })
        .await
    }

    async fn delete(&self, user_id: u64) -> Result<(), StoreError> {
        self.update(|map| map.remove(&user_id).is_some()).await
    }

    async fn persist(&self, map: &HashMap<u64, T>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(map)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[async_trait]
impl BindingStore for JsonKeyValueStore<DocBinding> {
    async fn get_binding(&self, user_id: u64) -> Result<Option<DocBinding>, StoreError> {
        Ok(self.get(user_id).await)
    }

    async fn save_binding(&self, user_id: u64, binding: DocBinding) -> Result<(), StoreError> {
        self.put(user_id, binding).await
    }
}

#[async_trait]
impl SessionStore for JsonKeyValueStore<Session> {
    async fn get_session(&self, user_id: u64) -> Result<Option<Session>, StoreError> {
        Ok(self.get(user_id).await)
    }

    async fn save_session(&self, user_id: u64, session: Session) -> Result<(), StoreError> {
        self.put(user_id, session).await
    }

    async fn remove_session(&self, user_id: u64) -> Result<(), StoreError> {
        self.delete(user_id).await
    }
}
