//! In-memory credential store backed by nickname lists behind a `RwLock`.

use raclient_types::CredentialStore;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct Entries {
    certificates: Vec<String>,
    private_keys: Vec<String>,
}

/// An in-memory [`CredentialStore`] for tests and ad hoc sessions.
///
/// Entries can be added while the store is shared, so counts observed by the
/// token model always reflect the current contents.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    entries: RwLock<Entries>,
}

impl InMemoryCredentialStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given certificate and private-key nicknames.
    #[must_use]
    pub fn with_entries<C, K>(certificates: C, private_keys: K) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            entries: RwLock::new(Entries {
                certificates: certificates.into_iter().map(Into::into).collect(),
                private_keys: private_keys.into_iter().map(Into::into).collect(),
            }),
        }
    }

    /// Appends a certificate and returns its index.
    pub fn add_certificate(&self, nickname: impl Into<String>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.certificates.push(nickname.into());
        entries.certificates.len() - 1
    }

    /// Appends a private key and returns its index.
    pub fn add_private_key(&self, nickname: impl Into<String>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.private_keys.push(nickname.into());
        entries.private_keys.len() - 1
    }

    fn read<T>(&self, f: impl FnOnce(&Entries) -> T) -> T {
        f(&self.entries.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn certificate_count(&self) -> usize {
        self.read(|e| e.certificates.len())
    }

    fn certificate_nickname(&self, index: usize) -> Option<String> {
        self.read(|e| e.certificates.get(index).cloned())
    }

    fn private_key_count(&self) -> usize {
        self.read(|e| e.private_keys.len())
    }

    fn private_key_nickname(&self, index: usize) -> Option<String> {
        self.read(|e| e.private_keys.get(index).cloned())
    }
}
