use serde::{Deserialize, Serialize};

use crate::error::{FocusError, Result};

/// Message sent from a page context to the background context.
///
/// Wire form: `{"action": "closeTab"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RuntimeMessage {
    /// Close the tab the message was sent from.
    CloseTab,
}

impl RuntimeMessage {
    pub fn action(self) -> &'static str {
        match self {
            RuntimeMessage::CloseTab => "closeTab",
        }
    }

    /// Decode a raw message; unknown or malformed actions are a bad request.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| FocusError::BadRequest(format!("invalid runtime message: {e}")))
    }

    pub fn to_json(self) -> String {
        serde_json::json!({ "action": self.action() }).to_string()
    }
}
