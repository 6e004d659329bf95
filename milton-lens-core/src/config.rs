//! Configuration loaded from `.milton-lens.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::milton::{AnalyzerOptions, PatternCatalog};
use crate::milton::analyzer::DEFAULT_SURFACE_MAX_CHARS;

pub const CONFIG_FILENAME: &str = ".milton-lens.toml";

/// env var pointing at an explicit config file
pub const CONFIG_ENV: &str = "MILTON_LENS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// cap on the surface structure length, 0 for no cap
    pub surface_max_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            surface_max_chars: DEFAULT_SURFACE_MAX_CHARS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// built-in rules to switch off, by name
    pub disabled: Vec<String>,
    /// extra rules appended after the built-in ones
    pub custom: Vec<CustomRule>,
}

/// a user defined rule; either `pattern` (a regex) or `phrases` must be set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRule {
    pub name: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub guidance: String,
}

impl Config {
    /// resolve the config for a run
    ///
    /// an explicit path, then `MILTON_LENS_CONFIG`, must exist and parse;
    /// otherwise the global and working directory files are merged leniently.
    pub fn load(explicit: Option<&Path>, dir: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Self::load_file(Path::new(&path));
            }
        }
        Ok(Self::load_merged(dir))
    }

    /// read and parse one config file
    pub fn load_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// merge `~/.milton-lens.toml` with `<dir>/.milton-lens.toml`; the
    /// directory file wins for every key it sets
    pub fn load_merged(dir: Option<&Path>) -> Config {
        let global = global_config_path().and_then(|p| load_value(&p));
        let local = dir.and_then(|d| load_value(&d.join(CONFIG_FILENAME)));

        let merged = match (&global, local) {
            (Some(g), Some(l)) => deep_merge(g.clone(), l),
            (Some(g), None) => g.clone(),
            (None, Some(l)) => l,
            (None, None) => return Config::default(),
        };

        let parsed: Result<Config, _> = merged.try_into();
        parsed.unwrap_or_else(|e| {
            warn!("ignoring invalid merged config: {e}");
            // the directory file may be the broken one, keep the global settings
            global
                .and_then(|g| {
                    let config: Result<Config, _> = g.try_into();
                    config.ok()
                })
                .unwrap_or_default()
        })
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            surface_max_chars: self.analysis.surface_max_chars,
        }
    }

    pub fn build_catalog(&self) -> Result<PatternCatalog, CatalogError> {
        PatternCatalog::from_config(&self.catalog)
    }
}

/// path of the global config file, when a home directory is known
pub fn global_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(Path::new(&home).join(CONFIG_FILENAME))
}

fn load_value(path: &Path) -> Option<toml::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Value>(&content) {
        Ok(value) => {
            debug!("loaded config from {}", path.display());
            Some(value)
        }
        Err(e) => {
            warn!("skipping unparsable config {}: {e}", path.display());
            None
        }
    }
}

/// table-wise merge, `over` wins; arrays are replaced, not concatenated
fn deep_merge(base: toml::Value, over: toml::Value) -> toml::Value {
    use toml::Value;

    match (base, over) {
        (Value::Table(mut b), Value::Table(o)) => {
            for (key, over_val) in o {
                let merged = match b.remove(&key) {
                    Some(base_val) => deep_merge(base_val, over_val),
                    None => over_val,
                };
                b.insert(key, merged);
            }
            Value::Table(b)
        }
        (_, over) => over,
    }
}
