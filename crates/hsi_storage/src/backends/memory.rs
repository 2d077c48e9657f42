use async_trait::async_trait;
use hsi_core::{KeyValueStore, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

/// Encodes a value the way it is kept in the map: strings verbatim,
/// everything else as JSON text.
pub(crate) fn encode(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

/// Inverse of [`encode`]. Text that is not valid JSON comes back as a string.
pub(crate) fn decode(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned().map(decode)
    }

    pub fn set(&mut self, key: &str, value: &Value) -> Result<()> {
        self.entries.insert(key.to_string(), encode(value)?);
        Ok(())
    }

    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-lifetime store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStore {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn connect(_url: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let store = self.store.read().await;
        Ok(store.get(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut store = self.store.write().await;
        store.set(key, &value)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.delete(key);
        Ok(())
    }
}
