//! Background (privileged) context: install-time defaults and runtime
//! message handling.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use focusguard_core::error::Result;
use focusguard_core::protocol::RuntimeMessage;
use focusguard_core::state::{self, STATE_KEYS};

use crate::guard::TabId;
use crate::messaging::Incoming;
use crate::obs::FocusMetrics;
use crate::store::StateStore;

/// Tab management host.
#[async_trait]
pub trait TabHost: Send + Sync {
    async fn close_tab(&self, tab_id: TabId) -> Result<()>;
}

pub struct Background {
    store: Arc<dyn StateStore>,
    tabs: Arc<dyn TabHost>,
    metrics: Arc<FocusMetrics>,
}

impl Background {
    pub fn new(
        store: Arc<dyn StateStore>,
        tabs: Arc<dyn TabHost>,
        metrics: Arc<FocusMetrics>,
    ) -> Self {
        Self { store, tabs, metrics }
    }

    /// Install hook: write defaults for missing or malformed fields.
    ///
    /// Must complete before navigation handling starts. Returns whether
    /// anything was written.
    pub async fn on_installed(&self) -> Result<bool> {
        let record = self.store.get(&STATE_KEYS).await?;
        match state::missing_defaults(&record) {
            Some(patch) => {
                tracing::info!(
                    keys = ?patch.keys().collect::<Vec<_>>(),
                    "writing default focus state"
                );
                self.store.set(patch).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Decode and execute one message from a page context.
    pub async fn handle_message(&self, incoming: &Incoming) -> Result<()> {
        let msg = match RuntimeMessage::from_json(&incoming.raw) {
            Ok(m) => m,
            Err(e) => {
                self.metrics
                    .runtime_messages
                    .inc(&[("action", "unknown"), ("outcome", "rejected")]);
                return Err(e);
            }
        };

        match msg {
            RuntimeMessage::CloseTab => {
                self.tabs.close_tab(incoming.sender).await?;
                tracing::info!(tab_id = incoming.sender, "closed tab on request");
            }
        }
        self.metrics
            .runtime_messages
            .inc(&[("action", msg.action()), ("outcome", "ok")]);
        Ok(())
    }

    /// Serve the message bus until every sender is dropped.
    pub async fn run(self, mut inbox: mpsc::Receiver<Incoming>) {
        while let Some(incoming) = inbox.recv().await {
            if let Err(e) = self.handle_message(&incoming).await {
                tracing::warn!(tab_id = incoming.sender, error = %e, "runtime message rejected");
            }
        }
        tracing::debug!("runtime bus closed");
    }
}
