//! Credential store backends the token model can reference.
//!
//! Provides an in-memory store for testing and a JSON manifest store for
//! describing a token's certificates and private keys on disk.

pub mod manifest;
pub mod memory;

pub use manifest::{Manifest, ManifestCredentialStore, ManifestEntry};
pub use memory::InMemoryCredentialStore;
