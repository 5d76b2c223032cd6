//! focusguard replay binary.
//!
//! Loads the runtime config, runs the install hook and the configured seed,
//! then evaluates every command-line URL as a top-frame navigation and prints
//! the resulting metrics.
//!
//! Config path: `FOCUSGUARD_CONFIG`, else `focusguard.yaml`, else defaults.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use async_trait::async_trait;
use tracing_subscriber::{fmt, EnvFilter};

use focusguard_core::error::Result;
use focusguard_runtime::background::TabHost;
use focusguard_runtime::config::{self, FocusConfig};
use focusguard_runtime::guard::{GuardDecision, NavigationEvent, Navigator, TabId};
use focusguard_runtime::FocusRuntime;

const DEFAULT_CONFIG: &str = "focusguard.yaml";

/// Host stand-in that only logs what a browser would do.
struct LogHost;

#[async_trait]
impl Navigator for LogHost {
    async fn redirect(&self, tab_id: TabId, url: &str) -> Result<()> {
        tracing::info!(tab_id, %url, "redirect");
        Ok(())
    }
}

#[async_trait]
impl TabHost for LogHost {
    async fn close_tab(&self, tab_id: TabId) -> Result<()> {
        tracing::info!(tab_id, "close tab");
        Ok(())
    }
}

fn load_config() -> Result<FocusConfig> {
    match std::env::var("FOCUSGUARD_CONFIG") {
        Ok(path) => config::load_from_file(&path),
        Err(_) if Path::new(DEFAULT_CONFIG).exists() => config::load_from_file(DEFAULT_CONFIG),
        Err(_) => Ok(FocusConfig::default()),
    }
}

async fn run(cfg: FocusConfig, urls: Vec<String>) -> Result<()> {
    let runtime = FocusRuntime::new(cfg)?;
    let host = Arc::new(LogHost);

    let _background = runtime.start_background(host.clone()).await?;
    runtime.apply_seed().await?;

    let guard = runtime.navigation_guard(host);
    for (i, url) in urls.into_iter().enumerate() {
        let ev = NavigationEvent::top_level(i as TabId + 1, url);
        match guard.on_committed(&ev).await? {
            GuardDecision::Redirected { host, target } => println!("BLOCK {host} -> {target}"),
            other => println!("PASS  {} ({})", ev.url, other.label()),
        }
    }

    print!("{}", runtime.metrics().render());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config load failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.filter));
    fmt().with_env_filter(filter).init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(cfg, urls).await {
        tracing::error!(error = %e, code = e.code().as_str(), "focusguard failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
