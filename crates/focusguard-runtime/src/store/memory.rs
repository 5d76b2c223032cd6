use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use focusguard_core::error::Result;
use focusguard_core::state::StorageRecord;

use super::{StateStore, StorageChange, ValueChange};

/// In-process storage: namespace -> record, plus one change channel shared by
/// all namespaces.
pub struct MemoryStorage {
    areas: DashMap<String, StorageRecord>,
    changes: broadcast::Sender<StorageChange>,
}

impl MemoryStorage {
    pub fn new(change_buffer: usize) -> Arc<Self> {
        let (changes, _) = broadcast::channel(change_buffer.max(1));
        Arc::new(Self {
            areas: DashMap::new(),
            changes,
        })
    }

    /// Handle bound to one namespace.
    pub fn area(self: &Arc<Self>, namespace: &str) -> StorageArea {
        StorageArea {
            storage: Arc::clone(self),
            namespace: Arc::from(namespace),
        }
    }

    fn read(&self, namespace: &str, keys: &[&str]) -> StorageRecord {
        let mut out = StorageRecord::new();
        if let Some(area) = self.areas.get(namespace) {
            for k in keys {
                if let Some(v) = area.get(*k) {
                    out.insert((*k).to_string(), v.clone());
                }
            }
        }
        out
    }

    /// Apply the patch under the shard lock; return the keys whose value changed.
    fn write(&self, namespace: &str, patch: StorageRecord) -> HashMap<String, ValueChange> {
        let mut changed = HashMap::new();
        let mut area = self.areas.entry(namespace.to_string()).or_default();
        for (k, v) in patch {
            let old = area.insert(k.clone(), v.clone());
            if old.as_ref() != Some(&v) {
                changed.insert(
                    k,
                    ValueChange {
                        old_value: old,
                        new_value: Some(v),
                    },
                );
            }
        }
        changed
    }

    fn publish(&self, change: StorageChange) {
        // No subscribers is fine.
        let receivers = self.changes.send(change).unwrap_or(0);
        tracing::trace!(receivers, "storage change published");
    }
}

/// `StateStore` handle for one namespace of a `MemoryStorage`.
#[derive(Clone)]
pub struct StorageArea {
    storage: Arc<MemoryStorage>,
    namespace: Arc<str>,
}

#[async_trait]
impl StateStore for StorageArea {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, keys: &[&str]) -> Result<StorageRecord> {
        Ok(self.storage.read(&self.namespace, keys))
    }

    async fn set(&self, patch: StorageRecord) -> Result<()> {
        let changes = self.storage.write(&self.namespace, patch);
        if changes.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            namespace = %self.namespace,
            keys = ?changes.keys().collect::<Vec<_>>(),
            "storage updated"
        );
        self.storage.publish(StorageChange {
            namespace: self.namespace.to_string(),
            changes,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.storage.changes.subscribe()
    }
}
