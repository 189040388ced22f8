//! Identity session gating archive writes.

use serde::{Deserialize, Serialize};

use crate::error::{DossierError, Result};

/// The signed-in identity. Presence of one is the precondition for archive
/// writes; stream generation and expansion are not gated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub joined_at: String,
}

impl Identity {
    /// Creates a session for the trimmed username.
    ///
    /// An empty (or all-whitespace) username is rejected and no session is
    /// created; the caller keeps the prompt open for correction.
    pub fn sign_in(username: &str) -> Result<Self> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(DossierError::validation("username must not be empty"));
        }
        Ok(Self {
            username: trimmed.to_string(),
            joined_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_trims_username() {
        let identity = Identity::sign_in("  ada  ").unwrap();
        assert_eq!(identity.username, "ada");
        assert!(!identity.joined_at.is_empty());
    }

    #[test]
    fn test_empty_username_is_rejected() {
        assert!(Identity::sign_in("").unwrap_err().is_validation());
        assert!(Identity::sign_in("   ").unwrap_err().is_validation());
    }
}
