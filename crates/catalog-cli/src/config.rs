use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// CLI configuration, read from `catalog/config.toml` under the XDG config
/// directory unless an explicit path is given.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub database: DatabaseSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub path: String,
}

impl CatalogConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }
}

/// Default config file location: `$XDG_CONFIG_HOME/catalog/config.toml`,
/// falling back to `$HOME/.config/catalog/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("catalog").join("config.toml"))
}
