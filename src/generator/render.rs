// file: src/generator/render.rs
// version: 1.0.0
// guid: 93b0e1c5-7d2a-4f68-a4c1-5e8f06d2b7a9

//! YAML rendering and manifest output

use super::{derive_agent_config, derive_install_config};
use crate::config::ClusterConfig;
use crate::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const INSTALL_CONFIG_FILE: &str = "install-config.yaml";
pub const AGENT_CONFIG_FILE: &str = "agent-config.yaml";

/// Which manifests to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Manifests {
    #[default]
    Both,
    InstallOnly,
    AgentOnly,
}

impl Manifests {
    pub fn includes_install(&self) -> bool {
        matches!(self, Manifests::Both | Manifests::InstallOnly)
    }

    pub fn includes_agent(&self) -> bool {
        matches!(self, Manifests::Both | Manifests::AgentOnly)
    }
}

/// Render `install-config.yaml`.
///
/// Multi-line values such as the trust bundle and SSH keys are emitted as
/// `|` block scalars rather than `|-`.
pub fn render_install_config(config: &ClusterConfig) -> Result<String> {
    let yaml = to_yaml(&derive_install_config(config))?;
    Ok(yaml.replace(": |-", ": |"))
}

/// Render `agent-config.yaml`
pub fn render_agent_config(config: &ClusterConfig) -> Result<String> {
    to_yaml(&derive_agent_config(config))
}

fn to_yaml<T: Serialize>(document: &T) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Write the selected manifests into `output_dir`, returning the written paths
pub async fn write_manifests(
    config: &ClusterConfig,
    output_dir: &Path,
    manifests: Manifests,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(output_dir).await?;

    let mut rendered = Vec::new();
    if manifests.includes_install() {
        rendered.push((INSTALL_CONFIG_FILE, render_install_config(config)?));
    }
    if manifests.includes_agent() {
        rendered.push((AGENT_CONFIG_FILE, render_agent_config(config)?));
    }

    let mut written = Vec::new();
    for (file_name, content) in rendered {
        let path = output_dir.join(file_name);
        tokio::fs::write(&path, content).await?;
        info!("Manifest written to: {}", path.display());
        written.push(path);
    }

    Ok(written)
}
