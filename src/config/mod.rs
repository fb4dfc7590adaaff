//! Configuration for provdeps
//!
//! Settings live in a TOML file, by default `~/.provdeps/config.toml`. The
//! `PROVDEPS_CONFIG` environment variable or the `--config` flag point at another
//! file. A missing file means defaults.
//!
//! ```toml
//! [slsa]
//! # Also collect type-hinted results of the completed task run behind each stage
//! deep_inspection = true
//!
//! [output]
//! format = "yaml"
//! pretty = true
//! ```

use crate::constants::CONFIG_ENV_VAR;
use crate::core::ProvdepsError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings that change what gets collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlsaConfig {
    #[serde(default)]
    pub deep_inspection: bool,
}

/// Serialization format of the resolved-dependency document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

const fn default_pretty() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: default_pretty(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvdepsConfig {
    #[serde(default)]
    pub slsa: SlsaConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ProvdepsConfig {
    /// Load from an explicit path, the environment override, or the default location.
    ///
    /// An explicit path that does not exist is an error; the implicit locations
    /// silently fall back to defaults.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(&path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            if !env_path.is_empty() {
                return Self::load_from(Path::new(&env_path));
            }
        }

        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!("No default config location: {}", e);
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .map_err(ProvdepsError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("provdeps")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".provdeps")
        };

        Ok(config_dir.join("config.toml"))
    }
}
