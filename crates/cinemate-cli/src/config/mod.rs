//! Settings for the `cinemate` binary.
//!
//! One TOML file holds the API key, the pass-key and client tuning. The
//! `CINEMATE_*` environment family can relocate the file and override the
//! credentials in it.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, AppConfig, PASSKEY_ENV};
pub use paths::{CONFIG_DIR_ENV, resolve_config_path};
