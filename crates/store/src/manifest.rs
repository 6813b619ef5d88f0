//! Credential store described by a JSON manifest file.
//!
//! The manifest lists what the token's external store holds, in index order:
//!
//! ```json
//! {
//!   "certificates": [{ "nickname": "Token Signing Cert" }],
//!   "private_keys": [{ "nickname": "Token Signing Key" }]
//! }
//! ```

use raclient_types::{CredentialStore, RaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::memory::InMemoryCredentialStore;

/// One certificate or private key entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub nickname: String,
}

/// On-disk manifest layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub certificates: Vec<ManifestEntry>,
    #[serde(default)]
    pub private_keys: Vec<ManifestEntry>,
}

/// A [`CredentialStore`] loaded once from a manifest file.
#[derive(Debug)]
pub struct ManifestCredentialStore {
    inner: InMemoryCredentialStore,
}

impl ManifestCredentialStore {
    /// Parses a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::Store`] if the JSON does not match the manifest layout.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)
            .map_err(|e| RaError::Store(format!("invalid credential manifest: {e}")))?;
        Ok(Self::from_manifest(manifest))
    }

    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::Store`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| RaError::Store(format!("cannot read {}: {e}", path.display())))?;
        let store = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            certificates = store.certificate_count(),
            private_keys = store.private_key_count(),
            "credential manifest loaded"
        );
        Ok(store)
    }

    #[must_use]
    pub fn from_manifest(manifest: Manifest) -> Self {
        Self {
            inner: InMemoryCredentialStore::with_entries(
                manifest.certificates.into_iter().map(|e| e.nickname),
                manifest.private_keys.into_iter().map(|e| e.nickname),
            ),
        }
    }
}

impl CredentialStore for ManifestCredentialStore {
    fn certificate_count(&self) -> usize {
        self.inner.certificate_count()
    }

    fn certificate_nickname(&self, index: usize) -> Option<String> {
        self.inner.certificate_nickname(index)
    }

    fn private_key_count(&self) -> usize {
        self.inner.private_key_count()
    }

    fn private_key_nickname(&self, index: usize) -> Option<String> {
        self.inner.private_key_nickname(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "certificates": [
            { "nickname": "Signing Cert" },
            { "nickname": "Encryption Cert" }
        ],
        "private_keys": [{ "nickname": "Signing Key" }]
    }"#;

    #[test]
    fn test_from_json() {
        let store = ManifestCredentialStore::from_json(SAMPLE).unwrap();
        assert_eq!(store.certificate_count(), 2);
        assert_eq!(
            store.certificate_nickname(1).as_deref(),
            Some("Encryption Cert")
        );
        assert_eq!(store.private_key_count(), 1);
    }

    #[test]
    fn test_missing_lists_default_empty() {
        let store = ManifestCredentialStore::from_json("{}").unwrap();
        assert_eq!(store.certificate_count(), 0);
        assert_eq!(store.private_key_count(), 0);
    }

    #[test]
    fn test_invalid_json() {
        let err = ManifestCredentialStore::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, RaError::Store(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let store = ManifestCredentialStore::from_file(&path).unwrap();
        assert_eq!(store.private_key_nickname(0).as_deref(), Some("Signing Key"));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ManifestCredentialStore::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
