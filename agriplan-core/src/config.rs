//! Configuration file support for agriplan
//!
//! Loads optional interpretation settings from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.agriplanrc.json` in the working directory
//! 3. `agriplan.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::conditioning::ConditioningThresholds;
use crate::narrative::DEFAULT_RESOURCES;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// agriplan configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgriplanConfig {
    /// Custom conditioning band thresholds
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Sort risk flags by severity when presenting (default: rule order)
    #[serde(default)]
    pub sort_flags: Option<bool>,

    /// Crop names used when an input file carries none
    #[serde(default)]
    pub crops: Vec<String>,

    /// Resource names used when an input file carries none
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Custom conditioning band thresholds on κ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// κ at which a system becomes moderately sensitive (default: 100)
    pub moderate: Option<f64>,
    /// κ at which a system becomes fragile (default: 10000)
    pub fragile: Option<f64>,
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub thresholds: ConditioningThresholds,
    pub sort_flags: bool,
    pub crops: Vec<String>,
    pub resources: Vec<String>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl AgriplanConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref t) = self.thresholds {
            let defaults = ConditioningThresholds::default();
            let moderate = t.moderate.unwrap_or(defaults.moderate);
            let fragile = t.fragile.unwrap_or(defaults.fragile);

            for (name, value) in [("moderate", moderate), ("fragile", fragile)] {
                if !value.is_finite() || value <= 0.0 {
                    anyhow::bail!("thresholds.{} must be positive (got {})", name, value);
                }
            }
            if moderate >= fragile {
                anyhow::bail!(
                    "thresholds.moderate ({}) must be less than thresholds.fragile ({})",
                    moderate,
                    fragile
                );
            }
        }

        if self.crops.iter().any(|c| c.trim().is_empty()) {
            anyhow::bail!("crops must not contain empty names");
        }
        if self.resources.iter().any(|r| r.trim().is_empty()) {
            anyhow::bail!("resources must not contain empty names");
        }

        Ok(())
    }

    /// Resolve config into the form used by interpretation
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let defaults = ConditioningThresholds::default();
        let thresholds = match &self.thresholds {
            Some(t) => ConditioningThresholds {
                moderate: t.moderate.unwrap_or(defaults.moderate),
                fragile: t.fragile.unwrap_or(defaults.fragile),
            },
            None => defaults,
        };

        let resources = if self.resources.is_empty() {
            DEFAULT_RESOURCES.iter().map(|r| r.to_string()).collect()
        } else {
            self.resources.clone()
        };

        Ok(ResolvedConfig {
            thresholds,
            sort_flags: self.sort_flags.unwrap_or(false),
            crops: self.crops.clone(),
            resources,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        AgriplanConfig::default().resolve()
    }
}

/// Discover and load a config file from a directory
///
/// Search order:
/// 1. `.agriplanrc.json`
/// 2. `agriplan.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(root: &Path) -> Result<Option<(AgriplanConfig, PathBuf)>> {
    for name in [".agriplanrc.json", "agriplan.config.json"] {
        let path = root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<AgriplanConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: AgriplanConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `root`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(root)? {
            Some((config, path)) => (config, Some(path)),
            None => (AgriplanConfig::default(), None),
        }
    };

    tracing::debug!(source = ?source_path, "resolved configuration");

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
