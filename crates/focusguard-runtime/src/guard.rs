//! Navigation guard (background context).
//!
//! Runs once per committed top-level navigation:
//! - skip subframes, non-http(s) schemes, and the notice page itself
//! - read the focus record fresh
//! - inactive: no action
//! - unparseable URL: no action (fail open)
//! - disallowed host: redirect the tab to the notice target, exactly once

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use focusguard_core::error::Result;
use focusguard_core::policy::is_allowed;

use crate::notice::NoticeTarget;
use crate::obs::FocusMetrics;
use crate::store::StateStore;

/// Host tab identifier.
pub type TabId = u32;

/// Top frame id as reported by the host.
pub const TOP_FRAME: u32 = 0;

/// A committed navigation as delivered by the host.
#[derive(Debug, Clone)]
pub struct NavigationEvent {
    pub tab_id: TabId,
    pub frame_id: u32,
    pub url: String,
}

impl NavigationEvent {
    pub fn top_level(tab_id: TabId, url: impl Into<String>) -> Self {
        Self {
            tab_id,
            frame_id: TOP_FRAME,
            url: url.into(),
        }
    }
}

/// Navigation interception host: the only side effect the guard performs.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn redirect(&self, tab_id: TabId, url: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Subframe,
    Scheme,
    NoticePage,
}

/// Outcome of evaluating one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Skipped(SkipReason),
    Inactive,
    FailOpen,
    Allowed { host: String },
    Redirected { host: String, target: String },
}

impl GuardDecision {
    pub fn label(&self) -> &'static str {
        match self {
            GuardDecision::Skipped(SkipReason::Subframe) => "skipped_subframe",
            GuardDecision::Skipped(SkipReason::Scheme) => "skipped_scheme",
            GuardDecision::Skipped(SkipReason::NoticePage) => "skipped_notice",
            GuardDecision::Inactive => "inactive",
            GuardDecision::FailOpen => "fail_open",
            GuardDecision::Allowed { .. } => "allowed",
            GuardDecision::Redirected { .. } => "redirected",
        }
    }
}

fn is_web_url(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Stateless between events: everything it decides on is read per event.
pub struct NavigationGuard {
    store: Arc<dyn StateStore>,
    navigator: Arc<dyn Navigator>,
    notice: NoticeTarget,
    metrics: Arc<FocusMetrics>,
}

impl NavigationGuard {
    pub fn new(
        store: Arc<dyn StateStore>,
        navigator: Arc<dyn Navigator>,
        notice: NoticeTarget,
        metrics: Arc<FocusMetrics>,
    ) -> Self {
        Self {
            store,
            navigator,
            notice,
            metrics,
        }
    }

    /// Evaluate one committed navigation and redirect if it is blocked.
    pub async fn on_committed(&self, ev: &NavigationEvent) -> Result<GuardDecision> {
        let decision = self.evaluate(ev).await?;

        if let GuardDecision::Redirected { host, target } = &decision {
            self.navigator.redirect(ev.tab_id, target).await?;
            tracing::info!(tab_id = ev.tab_id, %host, %target, "navigation blocked");
        } else {
            tracing::debug!(
                tab_id = ev.tab_id,
                url = %ev.url,
                decision = decision.label(),
                "navigation passed"
            );
        }

        self.metrics
            .guard_decisions
            .inc(&[("decision", decision.label())]);
        Ok(decision)
    }

    async fn evaluate(&self, ev: &NavigationEvent) -> Result<GuardDecision> {
        if ev.frame_id != TOP_FRAME {
            return Ok(GuardDecision::Skipped(SkipReason::Subframe));
        }
        if self.notice.is_notice_url(&ev.url) {
            return Ok(GuardDecision::Skipped(SkipReason::NoticePage));
        }
        if !is_web_url(&ev.url) {
            return Ok(GuardDecision::Skipped(SkipReason::Scheme));
        }

        let state = self.store.focus_state().await?;
        if !state.is_blocking {
            return Ok(GuardDecision::Inactive);
        }

        let host = match Url::parse(&ev.url) {
            Ok(url) => match url.host_str() {
                Some(h) if !h.is_empty() => h.to_string(),
                _ => return Ok(GuardDecision::FailOpen),
            },
            Err(e) => {
                tracing::debug!(
                    tab_id = ev.tab_id,
                    url = %ev.url,
                    error = %e,
                    "unparseable navigation url"
                );
                return Ok(GuardDecision::FailOpen);
            }
        };

        if is_allowed(&host, &state.allowed_domains) {
            return Ok(GuardDecision::Allowed { host });
        }

        let target = self.notice.url_for(&host);
        Ok(GuardDecision::Redirected { host, target })
    }

    /// Drive the guard from a host event feed until the feed closes.
    ///
    /// Errors from a single event are logged; the loop keeps going.
    pub async fn run(self, mut events: mpsc::Receiver<NavigationEvent>) {
        while let Some(ev) = events.recv().await {
            if let Err(e) = self.on_committed(&ev).await {
                tracing::warn!(
                    tab_id = ev.tab_id,
                    error = %e,
                    code = e.code().as_str(),
                    "navigation check failed"
                );
            }
        }
        tracing::debug!("navigation feed closed");
    }
}
