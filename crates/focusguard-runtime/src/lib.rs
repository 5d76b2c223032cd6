//! focusguard runtime library entry.
//!
//! Wires the state store, navigation guard, presence overlay, settings
//! controller, and background message handling into one runtime. It is
//! consumed by the replay binary (`main.rs`) and by integration tests; real
//! hosts plug in through the `Navigator`, `TabHost`, `Document`, and
//! `StateStore` traits.

pub mod app_state;
pub mod background;
pub mod config;
pub mod guard;
pub mod messaging;
pub mod notice;
pub mod obs;
pub mod overlay;
pub mod settings;
pub mod store;

pub use app_state::FocusRuntime;
