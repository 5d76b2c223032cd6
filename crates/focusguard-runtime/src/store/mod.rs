//! State store seam: key-value persistence with change notification.
//!
//! Every context reads through `StateStore` immediately before each decision
//! and reacts to `StorageChange` notifications by re-reading, never by trusting
//! a cached copy.

mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use focusguard_core::error::Result;
use focusguard_core::state::{FocusState, StorageRecord, STATE_KEYS};

pub use memory::{MemoryStorage, StorageArea};

/// Old/new value pair for one changed key.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// One completed write, as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    pub namespace: String,
    pub changes: HashMap<String, ValueChange>,
}

impl StorageChange {
    /// True if this change is in `namespace` and touches any of `keys`.
    pub fn touches(&self, namespace: &str, keys: &[&str]) -> bool {
        self.namespace == namespace && keys.iter().any(|k| self.changes.contains_key(*k))
    }
}

/// A single storage namespace.
///
/// Each `get`/`set` call is atomic from the caller's point of view. There is no
/// multi-key transaction: the two focus fields are written independently.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Namespace this handle reads and writes.
    fn namespace(&self) -> &str;

    /// Read the given keys; absent keys are simply missing from the record.
    async fn get(&self, keys: &[&str]) -> Result<StorageRecord>;

    /// Merge `patch` into the namespace and notify subscribers after the write.
    async fn set(&self, patch: StorageRecord) -> Result<()>;

    /// Subscribe to changes from every namespace; receivers filter by namespace.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;

    /// Fresh typed read of the focus record, defaulting malformed fields.
    async fn focus_state(&self) -> Result<FocusState> {
        let record = self.get(&STATE_KEYS).await?;
        Ok(FocusState::from_record(&record))
    }
}
