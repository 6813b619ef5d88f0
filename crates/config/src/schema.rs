use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Yaml};
use raclient_types::{DecodePolicy, ParameterSet};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `RACLIENT_DECODE_POLICY=lenient`.
pub const ENV_PREFIX: &str = "RACLIENT_";

fn default_level() -> String {
    "info".to_string()
}

/// Process diagnostics (not the operator debug log).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset (defaults to `info`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Write diagnostics to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

/// A YAML or environment scalar kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.map(String::from))
}

fn text_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, String>, D::Error> {
    Ok(BTreeMap::<String, Scalar>::deserialize(d)?
        .into_iter()
        .map(|(k, v)| (k, v.into()))
        .collect())
}

/// Initial token values, applied through `token_set` at start-up.
///
/// Every field is kept as text and decoded by `token_set` under the active
/// decode policy. Quote hex values in YAML: an unquoted `0102` reads as the
/// number 102.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSeed {
    #[serde(default, deserialize_with = "optional_text")]
    pub cuid: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub msn: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub app_ver: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub major_ver: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub minor_ver: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub key_info: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub auth_key: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub mac_key: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub kek_key: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub pin: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub life_cycle_state: Option<String>,
}

impl TokenSeed {
    /// The seed as `token_set` parameters; unset fields are left out.
    #[must_use]
    pub fn to_params(&self) -> ParameterSet {
        [
            ("cuid", &self.cuid),
            ("msn", &self.msn),
            ("app_ver", &self.app_ver),
            ("major_ver", &self.major_ver),
            ("minor_ver", &self.minor_ver),
            ("key_info", &self.key_info),
            ("auth_key", &self.auth_key),
            ("mac_key", &self.mac_key),
            ("kek_key", &self.kek_key),
            ("pin", &self.pin),
            ("life_cycle_state", &self.life_cycle_state),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_params().is_empty()
    }
}

/// Top-level console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How hex and decimal parameters are validated (defaults to strict).
    #[serde(default)]
    pub decode_policy: DecodePolicy,
    /// Session variables set on top of the built-in `ra_*` seeds.
    #[serde(default, deserialize_with = "text_map")]
    pub variables: BTreeMap<String, String>,
    /// Token fields to populate before the first command.
    #[serde(default)]
    pub token: TokenSeed,
    /// Debug log opened at start-up, as if `op=debug` had been issued.
    #[serde(default)]
    pub debug_log: Option<PathBuf>,
    /// JSON manifest describing the external certificate/key store.
    #[serde(default)]
    pub credentials: Option<PathBuf>,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Defaults, then the optional YAML file, then `RACLIENT_*` environment
    /// variables (`__` separates nested keys, e.g. `RACLIENT_LOG__LEVEL`).
    ///
    /// Environment values are taken verbatim, so `RACLIENT_TOKEN__CUID=0102`
    /// keeps its leading zero.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if any source cannot be parsed.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        for (key, value) in Env::prefixed(ENV_PREFIX).split("__").iter() {
            figment = figment.merge(Serialized::default(key.as_str(), value));
        }
        figment.extract()
    }
}
