//! Top-level facade crate for focusguard.
//!
//! Re-exports the policy core and the runtime so users can depend on a single crate.

pub mod core {
    pub use focusguard_core::*;
}

pub mod runtime {
    pub use focusguard_runtime::*;
}
