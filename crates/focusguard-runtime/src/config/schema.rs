use focusguard_core::error::{FocusError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FocusConfig {
    pub version: u32,

    #[serde(default)]
    pub extension: ExtensionSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub log: LogSection,

    /// Initial record written by the replay binary after the install hook.
    #[serde(default)]
    pub seed: Option<SeedState>,
}

impl FocusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FocusError::UnsupportedVersion);
        }
        self.extension.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            version: 1,
            extension: ExtensionSection::default(),
            storage: StorageSection::default(),
            log: LogSection::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionSection {
    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default = "default_notice_page")]
    pub notice_page: String,

    #[serde(default = "default_notice_param")]
    pub notice_param: String,
}

impl Default for ExtensionSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            notice_page: default_notice_page(),
            notice_param: default_notice_param(),
        }
    }
}

impl ExtensionSection {
    pub fn validate(&self) -> Result<()> {
        if !self.root.contains("://") {
            return Err(FocusError::BadRequest(
                "extension.root must be an absolute URL (scheme://host)".into(),
            ));
        }
        if self.notice_page.trim().is_empty() || self.notice_page.contains('?') {
            return Err(FocusError::BadRequest(
                "extension.notice_page must be a non-empty path without a query".into(),
            ));
        }
        if self.notice_param.trim().is_empty() {
            return Err(FocusError::BadRequest("extension.notice_param must not be empty".into()));
        }
        Ok(())
    }
}

fn default_root() -> String {
    "chrome-extension://focusguard".into()
}
fn default_notice_page() -> String {
    "blocked.html".into()
}
fn default_notice_param() -> String {
    "blocked".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// Only change notifications from this namespace are observed.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Capacity of the change-notification channel.
    #[serde(default = "default_change_buffer")]
    pub change_buffer: usize,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            change_buffer: default_change_buffer(),
        }
    }
}

impl StorageSection {
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(FocusError::BadRequest("storage.namespace must not be empty".into()));
        }
        if !(1..=4096).contains(&self.change_buffer) {
            return Err(FocusError::BadRequest(
                "storage.change_buffer must be between 1 and 4096".into(),
            ));
        }
        Ok(())
    }
}

fn default_namespace() -> String {
    "sync".into()
}
fn default_change_buffer() -> usize {
    64
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

fn default_filter() -> String {
    "info".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedState {
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub is_blocking: bool,
}
