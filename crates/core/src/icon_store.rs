use std::collections::HashMap;

use async_trait::async_trait;
use sns_common::icon_object_key;
use tokio::sync::RwLock;

use crate::SnsError;

/// Opaque icon strings keyed by username.
#[async_trait]
pub trait IconStore: Send + Sync {
    /// The stored icon, or `""` when the user never set one.
    async fn get_icon(&self, username: &str) -> Result<String, SnsError>;

    async fn put_icon(&self, username: &str, icon_image: &str) -> Result<(), SnsError>;
}

/// Keeps icons in process memory, under the same object keys as the bucket.
#[derive(Debug, Default)]
pub struct MemoryIconStore {
    objects: RwLock<HashMap<String, String>>,
}

impl MemoryIconStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IconStore for MemoryIconStore {
    async fn get_icon(&self, username: &str) -> Result<String, SnsError> {
        let objects = self.objects.read().await;
        Ok(objects.get(&icon_object_key(username)).cloned().unwrap_or_default())
    }

    async fn put_icon(&self, username: &str, icon_image: &str) -> Result<(), SnsError> {
        self.objects.write().await.insert(icon_object_key(username), icon_image.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_icon_reads_empty() {
        let store = MemoryIconStore::new();
        assert_eq!(store.get_icon("alice").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryIconStore::new();
        store.put_icon("alice", "data:image/png;base64,AAAA").await.unwrap();
        assert_eq!(store.get_icon("alice").await.unwrap(), "data:image/png;base64,AAAA");
        assert_eq!(store.get_icon("bob").await.unwrap(), "");
    }
}
