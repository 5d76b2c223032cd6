//! In-memory host fakes shared by runtime integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use focusguard_core::error::{FocusError, Result};
use focusguard_runtime::background::TabHost;
use focusguard_runtime::config::FocusConfig;
use focusguard_runtime::guard::{Navigator, TabId};
use focusguard_runtime::overlay::Document;
use focusguard_runtime::FocusRuntime;

pub fn runtime() -> FocusRuntime {
    FocusRuntime::new(FocusConfig::default()).unwrap()
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub redirects: Mutex<Vec<(TabId, String)>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<(TabId, String)> {
        self.redirects.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn redirect(&self, tab_id: TabId, url: &str) -> Result<()> {
        self.redirects.lock().unwrap().push((tab_id, url.to_string()));
        Ok(())
    }
}

/// Navigator whose first `failures` redirects error out.
pub struct FlakyNavigator {
    failures: Mutex<usize>,
    pub attempts: Mutex<Vec<TabId>>,
    pub redirects: Mutex<Vec<(TabId, String)>>,
}

impl FlakyNavigator {
    pub fn failing(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures: Mutex::new(failures),
            attempts: Mutex::new(Vec::new()),
            redirects: Mutex::new(Vec::new()),
        })
    }

    pub fn attempts(&self) -> Vec<TabId> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn redirects(&self) -> Vec<(TabId, String)> {
        self.redirects.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for FlakyNavigator {
    async fn redirect(&self, tab_id: TabId, url: &str) -> Result<()> {
        self.attempts.lock().unwrap().push(tab_id);
        let mut left = self.failures.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(FocusError::Internal("tab gone".into()));
        }
        self.redirects.lock().unwrap().push((tab_id, url.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTabs {
    pub closed: Mutex<Vec<TabId>>,
}

impl RecordingTabs {
    pub fn closed(&self) -> Vec<TabId> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl TabHost for RecordingTabs {
    async fn close_tab(&self, tab_id: TabId) -> Result<()> {
        self.closed.lock().unwrap().push(tab_id);
        Ok(())
    }
}

/// A page whose overlay state is observable.
pub struct FakeDocument {
    hostname: Mutex<String>,
    overlay: Mutex<Option<String>>,
    mounts: Mutex<usize>,
}

impl FakeDocument {
    pub fn at(hostname: &str) -> Arc<Self> {
        Arc::new(Self {
            hostname: Mutex::new(hostname.to_string()),
            overlay: Mutex::new(None),
            mounts: Mutex::new(0),
        })
    }

    /// Same-document (history API) navigation.
    pub fn set_hostname(&self, hostname: &str) {
        *self.hostname.lock().unwrap() = hostname.to_string();
    }

    pub fn overlay_host(&self) -> Option<String> {
        self.overlay.lock().unwrap().clone()
    }

    pub fn mount_count(&self) -> usize {
        *self.mounts.lock().unwrap()
    }
}

impl Document for FakeDocument {
    fn hostname(&self) -> String {
        self.hostname.lock().unwrap().clone()
    }

    fn overlay_present(&self) -> bool {
        self.overlay.lock().unwrap().is_some()
    }

    fn mount_overlay(&self, hostname: &str) {
        *self.overlay.lock().unwrap() = Some(hostname.to_string());
        *self.mounts.lock().unwrap() += 1;
    }

    fn remove_overlay(&self) {
        *self.overlay.lock().unwrap() = None;
    }
}

/// Poll `cond` until it holds or a second passes.
pub async fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
