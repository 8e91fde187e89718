// file: src/config/loader.rs
// version: 1.0.0
// guid: 0f8e7f24-51b7-4a8c-9d1f-3c44e5bb2c16

//! Cluster definition loading and environment variable substitution

use super::validator::check_invariants;
use super::ClusterConfig;
use crate::error::WizardError;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env placeholder regex"));

/// Serialization format of a definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(WizardError::config(format!(
                "Unsupported definition file extension: {}",
                path.display()
            ))),
        }
    }
}

/// Definition loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a loader seeded from the process environment
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load a cluster definition, choosing the parser by file extension.
    ///
    /// Fields missing from the file take their defaults. The result is
    /// normalized and must satisfy the structural invariants.
    pub fn load_cluster_config<P: AsRef<Path>>(&self, path: P) -> Result<ClusterConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            WizardError::config(format!(
                "Failed to read cluster definition {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = self.parse_cluster_config(&content, format)?;
        info!(
            "Loaded cluster definition {} with {} nodes",
            path.display(),
            config.nodes.len()
        );
        Ok(config)
    }

    /// Parse definition text in the given format
    pub fn parse_cluster_config(&self, content: &str, format: ConfigFormat) -> Result<ClusterConfig> {
        let expanded = self.expand_env_vars(content)?;
        let config: ClusterConfig = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(&expanded)?,
            ConfigFormat::Toml => toml::from_str(&expanded)?,
            ConfigFormat::Json => serde_json::from_str(&expanded)?,
        };

        let config = config.normalized();
        check_invariants(&config)?;
        Ok(config)
    }

    /// Expand `${VAR}` placeholders; every referenced variable must be known
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let mut missing_vars = Vec::new();

        let expanded = ENV_PLACEHOLDER.replace_all(content, |caps: &regex::Captures| {
            match self.env_vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => {
                    missing_vars.push(caps[1].to_string());
                    caps[0].to_string()
                }
            }
        });

        if !missing_vars.is_empty() {
            missing_vars.dedup();
            return Err(WizardError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(expanded.into_owned())
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env_vars.insert(key.into(), value.into());
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read public keys from files, one key per non-blank line.
///
/// Paths go through `~` and `$VAR` expansion first.
pub async fn read_ssh_key_files(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut keys = Vec::new();

    for path in paths {
        let raw = path.to_string_lossy();
        let expanded = shellexpand::full(&raw)
            .map_err(|e| WizardError::config(format!("Cannot expand {}: {}", raw, e)))?;
        let content = tokio::fs::read_to_string(&*expanded)
            .await
            .map_err(|e| {
                WizardError::config(format!("Failed to read SSH key file {}: {}", expanded, e))
            })?;

        let before = keys.len();
        keys.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
        debug!("Read {} SSH keys from {}", keys.len() - before, expanded);
    }

    Ok(keys)
}
