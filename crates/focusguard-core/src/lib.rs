//! focusguard core: the allowlist policy, the persisted focus record, the
//! cross-context message protocol, and the shared error type.
//!
//! This crate carries no runtime or storage dependencies so the same decision
//! logic can run inside every execution context (background, page, settings).
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed persisted
//! state and malformed URLs degrade to defaults instead of failing.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod policy;
pub mod protocol;
pub mod state;

/// Shared result type.
pub use error::{FocusError, Result};
pub use policy::{is_allowed, normalize_domain_input, normalize_hostname};
pub use state::FocusState;
