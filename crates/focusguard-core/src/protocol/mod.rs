//! Cross-context message protocol.
//!
//! Page contexts have no authority over their hosting tab, so privileged
//! actions travel as small JSON messages to the background context.

pub mod message;

pub use message::RuntimeMessage;
