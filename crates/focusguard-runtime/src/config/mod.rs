//! Runtime config loader (strict YAML, unknown fields rejected).
//!
//! Sections: `extension` (notice page root/path/query parameter), `storage`
//! (observed namespace and change-channel capacity), `log` (fallback filter
//! when `RUST_LOG` is unset), and an optional `seed` record for the replay
//! binary. `version` must be `1`; ranges are checked after parsing.

pub mod schema;

use std::fs;

use focusguard_core::error::{FocusError, Result};

pub use schema::{ExtensionSection, FocusConfig, LogSection, SeedState, StorageSection};

pub fn load_from_file(path: &str) -> Result<FocusConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FocusError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<FocusConfig> {
    let cfg: FocusConfig = serde_yaml::from_str(s)
        .map_err(|e| FocusError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
