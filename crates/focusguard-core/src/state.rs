//! The persisted focus record: two keys in the synced storage namespace.

use serde_json::{Map, Value};

/// Storage key for the allowlist (array of strings).
pub const ALLOWED_DOMAINS_KEY: &str = "allowedDomains";
/// Storage key for the active flag (boolean).
pub const IS_BLOCKING_KEY: &str = "isBlocking";

/// Both keys, in the order every context requests them.
pub const STATE_KEYS: [&str; 2] = [ALLOWED_DOMAINS_KEY, IS_BLOCKING_KEY];

/// Raw storage record: key -> JSON value.
pub type StorageRecord = Map<String, Value>;

/// Typed view of the persisted record.
///
/// Built fresh from storage for every decision; never cached across events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    pub allowed_domains: Vec<String>,
    pub is_blocking: bool,
}

impl FocusState {
    /// Decode a storage record, defaulting anything absent or malformed.
    ///
    /// A non-array `allowedDomains` reads as `[]`; inside an array, non-string
    /// items are dropped. A non-boolean `isBlocking` reads as `false`.
    pub fn from_record(record: &StorageRecord) -> Self {
        let allowed_domains = match record.get(ALLOWED_DOMAINS_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        let is_blocking = record
            .get(IS_BLOCKING_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Self { allowed_domains, is_blocking }
    }

    /// Whether a page on `hostname` must be blocked under this state.
    pub fn blocks(&self, hostname: &str) -> bool {
        self.is_blocking && !crate::policy::is_allowed(hostname, &self.allowed_domains)
    }
}

/// Partial record writing only the allowlist.
pub fn allowed_domains_patch(domains: &[String]) -> StorageRecord {
    let mut patch = Map::new();
    patch.insert(
        ALLOWED_DOMAINS_KEY.to_string(),
        Value::Array(domains.iter().cloned().map(Value::String).collect()),
    );
    patch
}

/// Partial record writing only the active flag.
pub fn is_blocking_patch(flag: bool) -> StorageRecord {
    let mut patch = Map::new();
    patch.insert(IS_BLOCKING_KEY.to_string(), Value::Bool(flag));
    patch
}

/// Defaults for every field that is missing or has the wrong JSON type.
///
/// Returns `None` when the record is already well-formed, so startup never
/// rewrites state the user has set.
pub fn missing_defaults(record: &StorageRecord) -> Option<StorageRecord> {
    let mut patch = Map::new();
    if !matches!(record.get(ALLOWED_DOMAINS_KEY), Some(Value::Array(_))) {
        patch.insert(ALLOWED_DOMAINS_KEY.to_string(), Value::Array(Vec::new()));
    }
    if !matches!(record.get(IS_BLOCKING_KEY), Some(Value::Bool(_))) {
        patch.insert(IS_BLOCKING_KEY.to_string(), Value::Bool(false));
    }
    if patch.is_empty() {
        None
    } else {
        Some(patch)
    }
}
