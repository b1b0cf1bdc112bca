use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::JsonMode;

/// Defaults for the `tabular` driver, read from `tabular.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TabularConfig {
    pub database: Option<String>,
    pub json_mode: Option<JsonMode>,
    pub primary_key: Option<String>,
}

impl TabularConfig {
    /// Database path from the config, falling back to `tabular.db`
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("tabular.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("tabular.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<TabularConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: TabularConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &TabularConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
