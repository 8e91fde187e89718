// file: src/generator/mod.rs
// version: 1.0.0
// guid: c1d6a2e4-3b8f-4907-8e5a-f04b7c2d19e6

//! Derivation of the Agent-Based Installer manifests.
//!
//! Both documents are pure functions of a [`ClusterConfig`](crate::config::ClusterConfig)
//! snapshot; rendering them repeatedly gives identical output.

pub mod agent_config;
pub mod install_config;
pub mod render;

pub use agent_config::{derive_agent_config, rendezvous_ip, AgentConfig};
pub use install_config::{derive_install_config, InstallConfig};
pub use render::{
    render_agent_config, render_install_config, write_manifests, Manifests, AGENT_CONFIG_FILE,
    INSTALL_CONFIG_FILE,
};
