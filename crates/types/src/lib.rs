//! Core types for the raclient workspace.
//!
//! This crate defines the data the console works on: the hex buffer codec,
//! per-invocation parameter sets, the token credential record and its status
//! snapshot, the credential store capability, and the shared error type.

pub mod codec;
pub mod error;
pub mod params;
pub mod token;
pub mod traits;

pub use codec::{Buffer, DecodePolicy};
pub use error::{CredentialKind, RaError, Result};
pub use params::ParameterSet;
pub use token::{BufferStatus, CredentialRef, LifeCycleState, TokenRecord, TokenStatus};
pub use traits::{CredentialStore, EmptyCredentialStore};
