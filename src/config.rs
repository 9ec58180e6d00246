//! Application configuration loaded from TOML.

use anyhow::{Context, Result};
use episweep_table::config::ParserConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub aliases: AliasConfig,
    pub repair: RepairConfig,
    pub write: WriteConfig,
}

/// Extra header aliases, appended after the built-in tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasConfig {
    pub episode: Vec<String>,
    pub title: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairConfig {
    pub enabled: bool,
    /// Mismatched-row fraction above which resynchronization runs.
    pub threshold: f32,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriteConfig {
    /// Copy the export to `<file>.bak` before overwriting it.
    pub backup: bool,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self { backup: true }
    }
}

impl Config {
    /// Build the core parser configuration from this file config.
    pub fn parser_config(&self) -> ParserConfig {
        let mut builder = ParserConfig::builder()
            .repair(self.repair.enabled)
            .repair_threshold(self.repair.threshold);
        for alias in &self.aliases.episode {
            builder = builder.extra_episode_alias(alias);
        }
        for alias in &self.aliases.title {
            builder = builder.extra_title_alias(alias);
        }
        builder.build()
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./episweep.toml", "~/.config/episweep/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}
