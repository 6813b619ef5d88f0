//! Unified error type for the raclient workspace.

use thiserror::Error;

/// Which list of the external credential store an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Certificate,
    PrivateKey,
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Certificate => write!(f, "certificate"),
            Self::PrivateKey => write!(f, "private key"),
        }
    }
}

/// Enumerates all error kinds that can occur across raclient crates.
#[derive(Debug, Error)]
pub enum RaError {
    /// A parameter value could not be decoded (bad hex, non-numeric version).
    #[error("malformed value for '{param}': {reason}")]
    MalformedInput { param: String, reason: String },

    /// A parameter the operation requires was not supplied.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    /// The operation name is not in the catalogue.
    #[error("unrecognized operation '{0}'")]
    UnrecognizedOperation(String),

    /// The debug log target could not be opened or written.
    #[error("cannot use '{path}': {source}")]
    ResourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A certificate or private-key index beyond the store bounds.
    #[error("{kind} index {index} out of range (store holds {count})")]
    IndexOutOfRange {
        kind: CredentialKind,
        index: usize,
        count: usize,
    },

    /// The credential store backend could not be loaded.
    #[error("credential store error: {0}")]
    Store(String),

    /// The console output channel failed.
    #[error("console write failed: {0}")]
    Console(#[source] std::io::Error),
}

impl RaError {
    /// Shorthand for [`RaError::MalformedInput`].
    pub fn malformed(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_malformed() {
        let err = RaError::malformed("cuid", "odd number of digits");
        assert_eq!(
            err.to_string(),
            "malformed value for 'cuid': odd number of digits"
        );
    }

    #[test]
    fn test_error_display_missing() {
        let err = RaError::MissingParameter("name".into());
        assert_eq!(err.to_string(), "missing required parameter 'name'");
    }

    #[test]
    fn test_error_display_index_out_of_range() {
        let err = RaError::IndexOutOfRange {
            kind: CredentialKind::PrivateKey,
            index: 4,
            count: 2,
        };
        let s = err.to_string();
        assert!(s.contains("private key"));
        assert!(s.contains('4'));
        assert!(s.contains("holds 2"));
    }

    #[test]
    fn test_resource_unavailable_keeps_source() {
        use std::error::Error as _;
        let err = RaError::ResourceUnavailable {
            path: "/nope/debug.log".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such dir"),
        };
        assert!(err.to_string().contains("/nope/debug.log"));
        assert!(err.source().is_some());
    }
}
