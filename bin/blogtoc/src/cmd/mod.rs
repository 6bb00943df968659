//! CLI command implementations.

pub mod annotate;
pub mod build;
pub mod check;

use std::path::{Path, PathBuf};

use blogtoc_core::Config;
use color_eyre::eyre::{Result, WrapErr};

/// Load configuration with `BLOGTOC__*` environment overrides.
pub fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))
}

/// Resolve a configured directory relative to the configuration file.
pub fn resolve_dir(config_path: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    config_path
        .parent()
        .map_or_else(|| dir.to_path_buf(), |base| base.join(dir))
}
