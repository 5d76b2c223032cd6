//! Runtime wiring: one store, one message bus, one metrics registry, and
//! constructors for each execution context.
//!
//! Contexts share nothing but these handles; each builds its decisions from a
//! fresh store read.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use focusguard_core::error::{FocusError, Result};
use focusguard_core::policy::normalize_domain_input;
use focusguard_core::state::{allowed_domains_patch, is_blocking_patch};

use crate::background::{Background, TabHost};
use crate::config::FocusConfig;
use crate::guard::{NavigationGuard, Navigator, TabId};
use crate::messaging::{Incoming, RuntimeBus};
use crate::notice::NoticeTarget;
use crate::obs::FocusMetrics;
use crate::overlay::{Document, PresenceOverlay};
use crate::settings::SettingsController;
use crate::store::{MemoryStorage, StateStore};

const BUS_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct FocusRuntime {
    inner: Arc<RuntimeInner>,
}

struct RuntimeInner {
    cfg: FocusConfig,
    storage: Arc<MemoryStorage>,
    store: Arc<dyn StateStore>,
    notice: NoticeTarget,
    bus: RuntimeBus,
    inbox: Mutex<Option<mpsc::Receiver<Incoming>>>,
    metrics: Arc<FocusMetrics>,
}

impl FocusRuntime {
    /// Build the runtime from a validated config.
    pub fn new(cfg: FocusConfig) -> Result<Self> {
        cfg.validate()?;

        let storage = MemoryStorage::new(cfg.storage.change_buffer);
        let store: Arc<dyn StateStore> = Arc::new(storage.area(&cfg.storage.namespace));
        let notice = NoticeTarget::new(&cfg.extension);
        let (bus, inbox) = RuntimeBus::new(BUS_CAPACITY);

        Ok(Self {
            inner: Arc::new(RuntimeInner {
                cfg,
                storage,
                store,
                notice,
                bus,
                inbox: Mutex::new(Some(inbox)),
                metrics: Arc::new(FocusMetrics::default()),
            }),
        })
    }

    /// Handle for the configured (synced) namespace.
    pub fn store(&self) -> Arc<dyn StateStore> {
        Arc::clone(&self.inner.store)
    }

    /// Underlying storage, for reaching other namespaces.
    pub fn storage(&self) -> Arc<MemoryStorage> {
        Arc::clone(&self.inner.storage)
    }

    pub fn metrics(&self) -> Arc<FocusMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    pub fn bus(&self) -> RuntimeBus {
        self.inner.bus.clone()
    }

    pub fn navigation_guard(&self, navigator: Arc<dyn Navigator>) -> NavigationGuard {
        NavigationGuard::new(self.store(), navigator, self.inner.notice.clone(), self.metrics())
    }

    /// Overlay for one page; its messages are sent on behalf of `tab_id`.
    pub fn presence_overlay(&self, tab_id: TabId, document: Arc<dyn Document>) -> PresenceOverlay {
        PresenceOverlay::new(
            self.store(),
            document,
            Arc::new(self.inner.bus.sender_for(tab_id)),
            self.metrics(),
        )
    }

    pub fn settings(&self) -> SettingsController {
        SettingsController::new(self.store(), self.metrics())
    }

    /// Run the install hook, then serve the message bus in the background.
    ///
    /// Defaults are in place when this returns, so navigation handling may
    /// start immediately after. Only one background context may be started.
    pub async fn start_background(&self, tabs: Arc<dyn TabHost>) -> Result<JoinHandle<()>> {
        let inbox = self
            .inner
            .inbox
            .lock()
            .map_err(|_| FocusError::Internal("inbox lock poisoned".into()))?
            .take()
            .ok_or_else(|| FocusError::Internal("background context already started".into()))?;

        let background = Background::new(self.store(), tabs, self.metrics());
        background.on_installed().await?;
        Ok(tokio::spawn(background.run(inbox)))
    }

    /// Write the configured seed record, if any.
    pub async fn apply_seed(&self) -> Result<()> {
        let Some(seed) = &self.inner.cfg.seed else {
            return Ok(());
        };

        let mut domains: Vec<String> = Vec::with_capacity(seed.allowed_domains.len());
        for raw in &seed.allowed_domains {
            let domain = normalize_domain_input(raw)
                .ok_or_else(|| FocusError::BadRequest(format!("invalid seed domain: {raw}")))?;
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }
        domains.sort();

        self.inner.store.set(allowed_domains_patch(&domains)).await?;
        self.inner.store.set(is_blocking_patch(seed.is_blocking)).await?;
        tracing::info!(domains = domains.len(), active = seed.is_blocking, "seed state applied");
        Ok(())
    }
}
