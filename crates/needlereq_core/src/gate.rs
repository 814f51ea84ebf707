//! Shared-secret gate in front of the deletion flow.
//!
//! # Invariants
//! - Access is denied unless the supplied secret equals the configured one.
//! - Secrets never appear in log output.

use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Secret used when no configuration overrides it.
pub const DEFAULT_DELETE_SECRET: &str = "1220";

/// Rejected deletion access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    IncorrectSecret,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncorrectSecret => write!(f, "incorrect deletion password"),
        }
    }
}

impl Error for AuthError {}

/// Compares user-supplied secrets against one expected value.
#[derive(Clone)]
pub struct DeleteGate {
    expected: String,
}

impl DeleteGate {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Grants access when `supplied` (trimmed) matches exactly.
    pub fn check(&self, supplied: &str) -> Result<(), AuthError> {
        if supplied.trim() == self.expected {
            return Ok(());
        }
        warn!("event=delete_gate module=gate status=denied");
        Err(AuthError::IncorrectSecret)
    }
}

impl Default for DeleteGate {
    fn default() -> Self {
        Self::new(DEFAULT_DELETE_SECRET)
    }
}

impl std::fmt::Debug for DeleteGate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeleteGate")
            .field("expected", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, DeleteGate};

    #[test]
    fn accepts_matching_secret() {
        let gate = DeleteGate::new("1220");
        assert_eq!(gate.check("1220"), Ok(()));
        assert_eq!(gate.check(" 1220\n"), Ok(()));
    }

    #[test]
    fn rejects_wrong_or_empty_secret() {
        let gate = DeleteGate::default();
        assert_eq!(gate.check("0000"), Err(AuthError::IncorrectSecret));
        assert_eq!(gate.check(""), Err(AuthError::IncorrectSecret));
        assert_eq!(gate.check("12200"), Err(AuthError::IncorrectSecret));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", DeleteGate::new("topsecret"));
        assert!(!rendered.contains("topsecret"));
    }
}
