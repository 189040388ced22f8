//! Error types for the dossier engine.

use thiserror::Error;

/// A shared error type for the dossier workspace.
///
/// Every asynchronous failure is converted to one of these variants at the
/// boundary of the operation that issued it; none of them is fatal to the
/// process. A failed operation leaves engine state unchanged.
#[derive(Error, Debug, Clone)]
pub enum DossierError {
    /// Persona generation failed (network, parse, or schema violation).
    /// No record is created; the caller surfaces this to the user.
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// Biography deepening failed. The record stays in its short form and
    /// the user may retry; this is logged, never surfaced as a blocking error.
    #[error("Expansion failed: {0}")]
    Expansion(String),

    /// Input rejected before any state change (e.g. empty username).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl DossierError {
    /// Creates a Synthesis error
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis(message.into())
    }

    /// Creates an Expansion error
    pub fn expansion(message: impl Into<String>) -> Self {
        Self::Expansion(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Check if this is a Synthesis error
    pub fn is_synthesis(&self) -> bool {
        matches!(self, Self::Synthesis(_))
    }

    /// Check if this is an Expansion error
    pub fn is_expansion(&self) -> bool {
        matches!(self, Self::Expansion(_))
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for DossierError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DossierError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DossierError>`.
pub type Result<T> = std::result::Result<T, DossierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_convert_with_kind() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err: DossierError = source.into();
        assert!(matches!(err, DossierError::Io { .. }));
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_json_errors_convert_to_serialization() {
        let source = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: DossierError = source.into();
        assert!(matches!(err, DossierError::Serialization { .. }));
        assert!(err.to_string().starts_with("Serialization error: JSON"));
    }
}
