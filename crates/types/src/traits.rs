//! Capabilities supplied by collaborators outside the console core.
//!
//! The token model never owns certificates or private keys; it reaches them
//! by zero-based index through whatever store the binary wires in.

/// Read-only view of an external certificate and private-key store.
pub trait CredentialStore: Send + Sync {
    /// Number of certificates currently held.
    fn certificate_count(&self) -> usize;
    /// Nickname of the certificate at `index`, or `None` past the end.
    fn certificate_nickname(&self, index: usize) -> Option<String>;
    /// Number of private keys currently held.
    fn private_key_count(&self) -> usize;
    /// Nickname of the private key at `index`, or `None` past the end.
    fn private_key_nickname(&self, index: usize) -> Option<String>;
}

/// A store that holds nothing. Used until a real store is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCredentialStore;

impl CredentialStore for EmptyCredentialStore {
    fn certificate_count(&self) -> usize {
        0
    }

    fn certificate_nickname(&self, _index: usize) -> Option<String> {
        None
    }

    fn private_key_count(&self) -> usize {
        0
    }

    fn private_key_nickname(&self, _index: usize) -> Option<String> {
        None
    }
}
