//! Shared error type across focusguard crates.

use thiserror::Error;

/// Stable error codes surfaced to logs and validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// User-entered domain did not normalize to a host.
    InvalidDomain,
    /// Domain is already on the allowlist.
    DuplicateDomain,
    /// Bulk add called with nothing selected.
    EmptySelection,
    /// Malformed message or config.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Storage or host failure.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidDomain => "INVALID_DOMAIN",
            ErrorCode::DuplicateDomain => "DUPLICATE_DOMAIN",
            ErrorCode::EmptySelection => "EMPTY_SELECTION",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FocusError>;

/// Unified error type used by core and runtime.
///
/// The `Display` text of the validation variants is what the settings surface
/// shows to the user.
#[derive(Debug, Error)]
pub enum FocusError {
    #[error("Enter a valid domain (example: wikipedia.org)")]
    InvalidDomain,
    #[error("Domain already in the list.")]
    DuplicateDomain,
    #[error("Select at least one tab to add.")]
    EmptySelection,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl FocusError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            FocusError::InvalidDomain => ErrorCode::InvalidDomain,
            FocusError::DuplicateDomain => ErrorCode::DuplicateDomain,
            FocusError::EmptySelection => ErrorCode::EmptySelection,
            FocusError::BadRequest(_) => ErrorCode::BadRequest,
            FocusError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            FocusError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for errors caused by the user's own input (shown inline, never logged as failures).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FocusError::InvalidDomain | FocusError::DuplicateDomain | FocusError::EmptySelection
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(
            FocusError::InvalidDomain.to_string(),
            "Enter a valid domain (example: wikipedia.org)"
        );
        assert_eq!(FocusError::DuplicateDomain.to_string(), "Domain already in the list.");
        assert!(FocusError::EmptySelection.is_validation());
        assert!(!FocusError::Internal("x".into()).is_validation());
        assert_eq!(FocusError::BadRequest("x".into()).code().as_str(), "BAD_REQUEST");
    }
}
