//! Token identity and key material held by the console.

use std::fmt;
use std::sync::Arc;

use crate::codec::Buffer;
use crate::error::{CredentialKind, RaError, Result};
use crate::traits::{CredentialStore, EmptyCredentialStore};

/// GlobalPlatform card life-cycle code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LifeCycleState(pub u8);

impl LifeCycleState {
    pub const OP_READY: Self = Self(0x01);
    pub const INITIALIZED: Self = Self(0x07);
    pub const SECURED: Self = Self(0x0F);
    pub const CARD_LOCKED: Self = Self(0x7F);
    pub const TERMINATED: Self = Self(0xFF);

    /// Name of a well-known code, `None` for anything else.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::OP_READY => Some("OP_READY"),
            Self::INITIALIZED => Some("INITIALIZED"),
            Self::SECURED => Some("SECURED"),
            Self::CARD_LOCKED => Some("CARD_LOCKED"),
            Self::TERMINATED => Some("TERMINATED"),
            _ => None,
        }
    }
}

impl fmt::LowerHex for LifeCycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// A certificate or private key located in the external store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRef {
    pub index: usize,
    pub nickname: String,
}

/// The token being personalized.
///
/// Every buffer field is replaced wholesale by its setter; nothing of the
/// previous value is kept.
#[derive(Clone)]
pub struct TokenRecord {
    cuid: Buffer,
    msn: Buffer,
    applet_version: Buffer,
    major_version: u8,
    minor_version: u8,
    key_info: Buffer,
    auth_key: Buffer,
    mac_key: Buffer,
    kek_key: Buffer,
    pin: String,
    life_cycle_state: LifeCycleState,
    store: Arc<dyn CredentialStore>,
}

impl Default for TokenRecord {
    fn default() -> Self {
        Self::new(Arc::new(EmptyCredentialStore))
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("cuid", &self.cuid)
            .field("msn", &self.msn)
            .field("applet_version", &self.applet_version)
            .field("major_version", &self.major_version)
            .field("minor_version", &self.minor_version)
            .field("life_cycle_state", &self.life_cycle_state)
            .finish_non_exhaustive()
    }
}

impl TokenRecord {
    /// Creates an empty record whose certificates and keys live in `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            cuid: Buffer::default(),
            msn: Buffer::default(),
            applet_version: Buffer::default(),
            major_version: 0,
            minor_version: 0,
            key_info: Buffer::default(),
            auth_key: Buffer::default(),
            mac_key: Buffer::default(),
            kek_key: Buffer::default(),
            pin: String::new(),
            life_cycle_state: LifeCycleState::default(),
            store,
        }
    }

    // ── Identity ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn cuid(&self) -> &Buffer {
        &self.cuid
    }

    pub fn set_cuid(&mut self, cuid: Buffer) {
        self.cuid = cuid;
    }

    #[must_use]
    pub fn msn(&self) -> &Buffer {
        &self.msn
    }

    pub fn set_msn(&mut self, msn: Buffer) {
        self.msn = msn;
    }

    #[must_use]
    pub fn applet_version(&self) -> &Buffer {
        &self.applet_version
    }

    pub fn set_applet_version(&mut self, version: Buffer) {
        self.applet_version = version;
    }

    #[must_use]
    pub fn major_version(&self) -> u8 {
        self.major_version
    }

    pub fn set_major_version(&mut self, version: u8) {
        self.major_version = version;
    }

    #[must_use]
    pub fn minor_version(&self) -> u8 {
        self.minor_version
    }

    pub fn set_minor_version(&mut self, version: u8) {
        self.minor_version = version;
    }

    #[must_use]
    pub fn life_cycle_state(&self) -> LifeCycleState {
        self.life_cycle_state
    }

    pub fn set_life_cycle_state(&mut self, state: LifeCycleState) {
        self.life_cycle_state = state;
    }

    // ── Key material ─────────────────────────────────────────────────────

    #[must_use]
    pub fn key_info(&self) -> &Buffer {
        &self.key_info
    }

    pub fn set_key_info(&mut self, key_info: Buffer) {
        self.key_info = key_info;
    }

    #[must_use]
    pub fn auth_key(&self) -> &Buffer {
        &self.auth_key
    }

    pub fn set_auth_key(&mut self, key: Buffer) {
        self.auth_key = key;
    }

    #[must_use]
    pub fn mac_key(&self) -> &Buffer {
        &self.mac_key
    }

    pub fn set_mac_key(&mut self, key: Buffer) {
        self.mac_key = key;
    }

    #[must_use]
    pub fn kek_key(&self) -> &Buffer {
        &self.kek_key
    }

    pub fn set_kek_key(&mut self, key: Buffer) {
        self.kek_key = key;
    }

    #[must_use]
    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn set_pin(&mut self, pin: impl Into<String>) {
        self.pin = pin.into();
    }

    // ── External credentials ─────────────────────────────────────────────

    #[must_use]
    pub fn certificate_count(&self) -> usize {
        self.store.certificate_count()
    }

    /// Looks up the certificate at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::IndexOutOfRange`] when `index` is not below the
    /// store's current certificate count.
    pub fn certificate(&self, index: usize) -> Result<CredentialRef> {
        let count = self.store.certificate_count();
        lookup(CredentialKind::Certificate, index, count, |i| {
            self.store.certificate_nickname(i)
        })
    }

    #[must_use]
    pub fn private_key_count(&self) -> usize {
        self.store.private_key_count()
    }

    /// Looks up the private key at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::IndexOutOfRange`] when `index` is not below the
    /// store's current private-key count.
    pub fn private_key(&self, index: usize) -> Result<CredentialRef> {
        let count = self.store.private_key_count();
        lookup(CredentialKind::PrivateKey, index, count, |i| {
            self.store.private_key_nickname(i)
        })
    }

    /// Projects every field for display. Does not touch the record.
    #[must_use]
    pub fn status(&self) -> TokenStatus {
        TokenStatus {
            life_cycle_state: self.life_cycle_state,
            pin: self.pin.clone(),
            applet_version: BufferStatus::of(&self.applet_version),
            major_version: self.major_version,
            minor_version: self.minor_version,
            cuid: BufferStatus::of(&self.cuid),
            msn: BufferStatus::of(&self.msn),
            key_info: BufferStatus::of(&self.key_info),
            auth_key: BufferStatus::of(&self.auth_key),
            mac_key: BufferStatus::of(&self.mac_key),
            kek_key: BufferStatus::of(&self.kek_key),
        }
    }
}

fn lookup(
    kind: CredentialKind,
    index: usize,
    count: usize,
    nickname: impl Fn(usize) -> Option<String>,
) -> Result<CredentialRef> {
    if index >= count {
        return Err(RaError::IndexOutOfRange { kind, index, count });
    }
    // a store may shrink between the count and the lookup
    let nickname = nickname(index).ok_or(RaError::IndexOutOfRange { kind, index, count })?;
    Ok(CredentialRef { index, nickname })
}

/// Hex rendering and length of one buffer field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferStatus {
    pub hex: String,
    pub size: usize,
}

impl BufferStatus {
    fn of(buf: &Buffer) -> Self {
        Self {
            hex: buf.to_hex(),
            size: buf.len(),
        }
    }
}

/// Read-only snapshot of a [`TokenRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatus {
    pub life_cycle_state: LifeCycleState,
    pub pin: String,
    pub applet_version: BufferStatus,
    pub major_version: u8,
    pub minor_version: u8,
    pub cuid: BufferStatus,
    pub msn: BufferStatus,
    pub key_info: BufferStatus,
    pub auth_key: BufferStatus,
    pub mac_key: BufferStatus,
    pub kek_key: BufferStatus,
}

impl TokenStatus {
    /// Console lines, integers in hex and buffers with their byte counts.
    /// A well-known life-cycle code is followed by its name.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let buffer = |name: &str, b: &BufferStatus| format!("{name} : '{}' ({} bytes)", b.hex, b.size);
        let state = match self.life_cycle_state.name() {
            Some(name) => format!("life_cycle_state : '{:x}' ({name})", self.life_cycle_state),
            None => format!("life_cycle_state : '{:x}'", self.life_cycle_state),
        };
        vec![
            state,
            format!("pin : '{}'", self.pin),
            buffer("app_ver", &self.applet_version),
            format!("major_ver : '{:x}'", self.major_version),
            format!("minor_ver : '{:x}'", self.minor_version),
            buffer("cuid", &self.cuid),
            buffer("msn", &self.msn),
            buffer("key_info", &self.key_info),
            buffer("auth_key", &self.auth_key),
            buffer("mac_key", &self.mac_key),
            buffer("kek_key", &self.kek_key),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStore {
        certs: Vec<&'static str>,
        keys: Vec<&'static str>,
    }

    impl CredentialStore for FixedStore {
        fn certificate_count(&self) -> usize {
            self.certs.len()
        }
        fn certificate_nickname(&self, index: usize) -> Option<String> {
            self.certs.get(index).map(ToString::to_string)
        }
        fn private_key_count(&self) -> usize {
            self.keys.len()
        }
        fn private_key_nickname(&self, index: usize) -> Option<String> {
            self.keys.get(index).map(ToString::to_string)
        }
    }

    fn record_with_store() -> TokenRecord {
        TokenRecord::new(Arc::new(FixedStore {
            certs: vec!["signing", "encryption"],
            keys: vec!["signing-key"],
        }))
    }

    #[test]
    fn test_defaults_are_empty() {
        let token = TokenRecord::default();
        assert!(token.cuid().is_empty());
        assert_eq!(token.major_version(), 0);
        assert_eq!(token.pin(), "");
        assert_eq!(token.certificate_count(), 0);
    }

    #[test]
    fn test_setter_replaces_value() {
        let mut token = TokenRecord::default();
        token.set_auth_key(Buffer::new(vec![1, 2, 3, 4]));
        token.set_auth_key(Buffer::new(vec![9]));
        assert_eq!(token.auth_key().as_bytes(), &[9]);
    }

    #[test]
    fn test_status_lines() {
        let mut token = TokenRecord::default();
        token.set_auth_key(Buffer::new(vec![0xaa, 0xbb, 0xcc]));
        token.set_major_version(17);
        token.set_life_cycle_state(LifeCycleState::SECURED);
        token.set_pin("1234");

        let status = token.status();
        assert_eq!(status.auth_key.hex, "aabbcc");
        assert_eq!(status.auth_key.size, 3);

        let lines = status.lines();
        assert_eq!(lines[0], "life_cycle_state : 'f' (SECURED)");
        assert_eq!(lines[1], "pin : '1234'");
        assert_eq!(lines[3], "major_ver : '11'");
        assert!(lines.contains(&"auth_key : 'aabbcc' (3 bytes)".to_string()));
        assert!(lines.contains(&"cuid : '' (0 bytes)".to_string()));
    }

    #[test]
    fn test_status_does_not_mutate() {
        let mut token = TokenRecord::default();
        token.set_cuid(Buffer::new(vec![1, 2]));
        let before = token.status();
        let _ = token.status().lines();
        assert_eq!(token.status(), before);
    }

    #[test]
    fn test_certificate_in_range() {
        let token = record_with_store();
        let cert = token.certificate(1).unwrap();
        assert_eq!(cert.index, 1);
        assert_eq!(cert.nickname, "encryption");
        assert_eq!(token.private_key(0).unwrap().nickname, "signing-key");
    }

    #[test]
    fn test_certificate_out_of_range() {
        let token = record_with_store();
        let err = token.certificate(2).unwrap_err();
        assert!(matches!(
            err,
            RaError::IndexOutOfRange {
                kind: CredentialKind::Certificate,
                index: 2,
                count: 2
            }
        ));
        assert!(matches!(
            token.private_key(1),
            Err(RaError::IndexOutOfRange { count: 1, .. })
        ));
    }

    #[test]
    fn test_life_cycle_names() {
        assert_eq!(LifeCycleState::SECURED.name(), Some("SECURED"));
        assert_eq!(LifeCycleState(0x42).name(), None);

        let mut token = TokenRecord::default();
        assert_eq!(token.status().lines()[0], "life_cycle_state : '0'");
        token.set_life_cycle_state(LifeCycleState(0x42));
        assert_eq!(token.status().lines()[0], "life_cycle_state : '42'");
    }
}
