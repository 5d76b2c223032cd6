//! Presence overlay (page context).
//!
//! Keeps one invariant: the overlay is mounted iff the page's host is blocked
//! under the current focus record. It is re-checked on load and on every
//! relevant storage change, always from a fresh read.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use focusguard_core::error::Result;
use focusguard_core::protocol::RuntimeMessage;
use focusguard_core::state::STATE_KEYS;

use crate::messaging::MessageSender;
use crate::obs::FocusMetrics;
use crate::store::{StateStore, StorageChange};

/// The loaded page as seen by the overlay.
///
/// Overlay presence lives in the document, not in the overlay handler.
pub trait Document: Send + Sync {
    /// Current `location.hostname` (may be empty, e.g. `about:blank`).
    fn hostname(&self) -> String;
    fn overlay_present(&self) -> bool;
    fn mount_overlay(&self, hostname: &str);
    fn remove_overlay(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayChange {
    Shown,
    Hidden,
    Unchanged,
}

pub struct PresenceOverlay {
    store: Arc<dyn StateStore>,
    document: Arc<dyn Document>,
    messenger: Arc<dyn MessageSender>,
    metrics: Arc<FocusMetrics>,
}

impl PresenceOverlay {
    pub fn new(
        store: Arc<dyn StateStore>,
        document: Arc<dyn Document>,
        messenger: Arc<dyn MessageSender>,
        metrics: Arc<FocusMetrics>,
    ) -> Self {
        Self {
            store,
            document,
            messenger,
            metrics,
        }
    }

    /// Read state fresh and mount/unmount the overlay accordingly.
    ///
    /// Hosts call this on load and after same-document (history) navigations.
    pub async fn check_and_apply(&self) -> Result<OverlayChange> {
        let host = self.document.hostname();
        if host.is_empty() {
            return Ok(OverlayChange::Unchanged);
        }

        let state = self.store.focus_state().await?;
        Ok(self.apply(&host, state.blocks(&host)))
    }

    /// Idempotent show/hide.
    pub fn apply(&self, host: &str, blocked: bool) -> OverlayChange {
        let present = self.document.overlay_present();
        let change = match (blocked, present) {
            (true, false) => {
                self.document.mount_overlay(host);
                OverlayChange::Shown
            }
            (false, true) => {
                self.document.remove_overlay();
                OverlayChange::Hidden
            }
            _ => OverlayChange::Unchanged,
        };

        match change {
            OverlayChange::Shown => {
                tracing::info!(%host, "overlay shown");
                self.metrics.overlay_transitions.inc(&[("change", "shown")]);
            }
            OverlayChange::Hidden => {
                tracing::info!(%host, "overlay hidden");
                self.metrics.overlay_transitions.inc(&[("change", "hidden")]);
            }
            OverlayChange::Unchanged => {}
        }
        change
    }

    /// "Close tab" from inside the overlay, delegated to the background.
    pub async fn request_close_tab(&self) -> Result<()> {
        self.messenger.send(RuntimeMessage::CloseTab).await
    }

    fn is_relevant(&self, change: &StorageChange) -> bool {
        change.touches(self.store.namespace(), &STATE_KEYS)
    }

    /// Initial check, then re-check on every relevant change until the
    /// notification channel closes.
    ///
    /// The receiver should be created before the initial read so no change
    /// slips between the two.
    pub async fn run(self, mut changes: broadcast::Receiver<StorageChange>) {
        self.recheck("load").await;

        loop {
            match changes.recv().await {
                Ok(change) => {
                    if self.is_relevant(&change) {
                        self.recheck("storage change").await;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "overlay lagged behind storage changes");
                    self.recheck("lagged").await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        let changes = self.store.subscribe();
        tokio::spawn(self.run(changes))
    }

    async fn recheck(&self, trigger: &'static str) {
        if let Err(e) = self.check_and_apply().await {
            tracing::warn!(trigger, error = %e, "overlay check failed");
        }
    }
}
