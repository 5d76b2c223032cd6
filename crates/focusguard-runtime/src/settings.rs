//! Settings controller (popup context): allowlist CRUD and the active flag.
//!
//! Every mutation is read-modify-write against the store without a
//! transaction. Two surfaces adding at the same moment can lose one entry;
//! the resulting list is still normalized and duplicate-free.

use std::collections::BTreeSet;
use std::sync::Arc;

use focusguard_core::error::{FocusError, Result};
use focusguard_core::policy::{normalize_domain_input, normalize_hostname};
use focusguard_core::state::{allowed_domains_patch, is_blocking_patch};
use focusguard_core::FocusState;

use crate::guard::TabId;
use crate::obs::FocusMetrics;
use crate::store::StateStore;

/// An open tab as listed by the host.
#[derive(Debug, Clone)]
pub struct TabInfo {
    pub id: TabId,
    pub url: Option<String>,
    pub title: Option<String>,
}

/// One row of the "add open tabs" picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabCandidate {
    pub tab_id: TabId,
    pub label: String,
    pub domain: String,
}

pub struct SettingsController {
    store: Arc<dyn StateStore>,
    metrics: Arc<FocusMetrics>,
}

impl SettingsController {
    pub fn new(store: Arc<dyn StateStore>, metrics: Arc<FocusMetrics>) -> Self {
        Self { store, metrics }
    }

    pub async fn state(&self) -> Result<FocusState> {
        self.store.focus_state().await
    }

    /// Add one user-entered domain. Returns the updated (sorted) list.
    pub async fn add_domain(&self, raw: &str) -> Result<Vec<String>> {
        let Some(domain) = normalize_domain_input(raw) else {
            return Err(self.reject(FocusError::InvalidDomain));
        };

        let mut domains = self.store.focus_state().await?.allowed_domains;
        if domains.iter().any(|d| normalize_hostname(d) == domain) {
            return Err(self.reject(FocusError::DuplicateDomain));
        }

        domains.push(domain.clone());
        domains.sort();
        self.store.set(allowed_domains_patch(&domains)).await?;
        tracing::info!(%domain, "domain allowed");
        Ok(domains)
    }

    /// Remove an entry; removing an absent entry leaves the list unchanged.
    pub async fn remove_domain(&self, domain: &str) -> Result<Vec<String>> {
        let mut domains = self.store.focus_state().await?.allowed_domains;
        let before = domains.len();
        domains.retain(|d| d != domain);
        if domains.len() != before {
            self.store.set(allowed_domains_patch(&domains)).await?;
            tracing::info!(%domain, "domain removed");
        }
        Ok(domains)
    }

    pub async fn set_active(&self, flag: bool) -> Result<()> {
        self.store.set(is_blocking_patch(flag)).await?;
        tracing::info!(active = flag, "focus mode toggled");
        Ok(())
    }

    /// Web tabs that can be offered for bulk add.
    pub fn tab_candidates(&self, tabs: &[TabInfo]) -> Vec<TabCandidate> {
        tabs.iter()
            .filter_map(|tab| {
                let url = tab.url.as_deref().filter(|u| u.starts_with("http"))?;
                let domain = normalize_domain_input(url)?;
                let title = tab
                    .title
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .unwrap_or("Untitled");
                Some(TabCandidate {
                    tab_id: tab.id,
                    label: format!("{title} - {domain}"),
                    domain,
                })
            })
            .collect()
    }

    /// Bulk add picked domains; the result is the sorted, deduplicated union.
    ///
    /// A picked domain already covered by an entry in another spelling
    /// (`WWW.a.com` vs `a.com`) is not added again.
    pub async fn add_domains(&self, selected: &[String]) -> Result<Vec<String>> {
        let picked: BTreeSet<String> = selected
            .iter()
            .filter_map(|s| normalize_domain_input(s))
            .collect();
        if picked.is_empty() {
            return Err(self.reject(FocusError::EmptySelection));
        }

        let current = self.store.focus_state().await?.allowed_domains;
        let known: BTreeSet<String> = current.iter().map(|d| normalize_hostname(d)).collect();
        let mut domains = current;
        domains.extend(picked.into_iter().filter(|d| !known.contains(d)));
        domains.sort();
        domains.dedup();
        self.store.set(allowed_domains_patch(&domains)).await?;
        tracing::info!(count = domains.len(), "allowlist extended from open tabs");
        Ok(domains)
    }

    fn reject(&self, err: FocusError) -> FocusError {
        if err.is_validation() {
            tracing::debug!(code = err.code().as_str(), "settings input rejected");
        } else {
            tracing::warn!(code = err.code().as_str(), error = %err, "settings operation failed");
        }
        self.metrics
            .settings_rejections
            .inc(&[("code", err.code().as_str())]);
        err
    }
}
