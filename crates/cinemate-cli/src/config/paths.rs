//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "CINEMATE_CONFIG_DIR";

/// File name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Sub-directory under the user's config home.
const APP_DIR: &str = "cinemate";

/// Resolves the config file path, first match wins:
///
/// 1. `{dir}/config.toml` when `--dir` is given.
/// 2. `$CINEMATE_CONFIG_DIR/config.toml`.
/// 3. `$XDG_CONFIG_HOME/cinemate/config.toml` (absolute paths only).
/// 4. `$HOME/.config/cinemate/config.toml`.
///
/// `lookup` reads environment variables (usually `std::env::var`); empty
/// values count as unset.
///
/// # Errors
///
/// Returns an error if none of the above yields a directory.
pub fn resolve_config_path(
    dir: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    let var = |name: &str| lookup(name).filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(d) = var(CONFIG_DIR_ENV) {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(xdg) = var("XDG_CONFIG_HOME").filter(|p| p.is_absolute()) {
        return Ok(xdg.join(APP_DIR).join(CONFIG_FILE));
    }
    if let Some(home) = var("HOME") {
        return Ok(home.join(".config").join(APP_DIR).join(CONFIG_FILE));
    }
    bail!("cannot locate config directory: pass --dir or set {CONFIG_DIR_ENV} or HOME")
}
