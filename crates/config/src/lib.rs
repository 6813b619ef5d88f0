//! Configuration loading for the raclient console.
//!
//! Uses figment for YAML-based configuration with sensible defaults and
//! `RACLIENT_`-prefixed environment overrides.

pub mod schema;

pub use schema::{Config, ENV_PREFIX, LogConfig, TokenSeed};
