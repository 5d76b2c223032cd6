//! Inter-context message bus: page contexts -> background context.
//!
//! Messages travel as JSON text, the way the host runtime delivers them, so
//! the receiving side decodes (and may reject) every message.

use async_trait::async_trait;
use tokio::sync::mpsc;

use focusguard_core::error::{FocusError, Result};
use focusguard_core::protocol::RuntimeMessage;

use crate::guard::TabId;

/// A raw message plus the tab it came from.
#[derive(Debug, Clone)]
pub struct Incoming {
    pub sender: TabId,
    pub raw: String,
}

/// Page-side sending capability.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, msg: RuntimeMessage) -> Result<()>;
}

/// Cloneable sending half of the bus.
#[derive(Clone)]
pub struct RuntimeBus {
    tx: mpsc::Sender<Incoming>,
}

impl RuntimeBus {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Incoming>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Sender bound to one tab (the page context's identity).
    pub fn sender_for(&self, tab_id: TabId) -> TabMessenger {
        TabMessenger {
            tab_id,
            bus: self.clone(),
        }
    }

    pub async fn post_raw(&self, sender: TabId, raw: String) -> Result<()> {
        self.tx
            .send(Incoming { sender, raw })
            .await
            .map_err(|_| FocusError::Internal("runtime bus closed".into()))
    }
}

#[derive(Clone)]
pub struct TabMessenger {
    tab_id: TabId,
    bus: RuntimeBus,
}

#[async_trait]
impl MessageSender for TabMessenger {
    async fn send(&self, msg: RuntimeMessage) -> Result<()> {
        self.bus.post_raw(self.tab_id, msg.to_json()).await
    }
}
