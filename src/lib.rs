// file: src/lib.rs
// version: 3.0.0
// guid: 9c4e7a12-d5b3-4f86-8a09-b2e6f1c7d340

//! # Agent Installer Config
//!
//! Cluster, node and network-interface model for the OpenShift Agent-Based
//! Installer, the rules that keep host network topologies consistent while
//! they are edited, and derivation of `install-config.yaml` and
//! `agent-config.yaml` from the model.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod topology;
pub mod utils;

pub use error::{Result, WizardError};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
