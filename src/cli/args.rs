// file: src/cli/args.rs
// version: 2.0.0
// guid: 1a7c3e95-b4d2-4f80-96e1-0d5b8a2c7f43

//! Command line argument definitions

use crate::config::ClusterType;
use crate::generator::Manifests;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agent-installer-config")]
#[command(about = "Generate OpenShift Agent-Based Installer manifests from a cluster definition")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render install-config.yaml and agent-config.yaml
    Generate {
        #[arg(short, long, help = "Cluster definition (.yaml, .yml, .toml or .json)")]
        config: PathBuf,

        #[arg(short, long, help = "Directory for the rendered manifests")]
        output_dir: Option<PathBuf>,

        #[arg(long = "ssh-key-file", help = "Public key file to add to sshKey")]
        ssh_key_files: Vec<PathBuf>,

        #[arg(long, value_enum)]
        only: Option<ManifestArg>,

        #[arg(long, help = "Print the manifests instead of writing files", conflicts_with = "output_dir")]
        stdout: bool,
    },

    /// Check a cluster definition and report problems
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Write a starter cluster definition
    Init {
        #[arg(short = 't', long, value_enum, default_value = "ha")]
        cluster_type: ClusterTypeArg,

        #[arg(short, long, help = "Destination file, stdout when omitted")]
        output: Option<PathBuf>,
    },
}

/// Manifest selector for `--only`
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ManifestArg {
    Install,
    Agent,
}

impl From<Option<ManifestArg>> for Manifests {
    fn from(only: Option<ManifestArg>) -> Self {
        match only {
            None => Manifests::Both,
            Some(ManifestArg::Install) => Manifests::InstallOnly,
            Some(ManifestArg::Agent) => Manifests::AgentOnly,
        }
    }
}

/// Cluster topology argument for CLI
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ClusterTypeArg {
    Sno,
    Compact,
    Ha,
}

impl From<ClusterTypeArg> for ClusterType {
    fn from(arg: ClusterTypeArg) -> Self {
        match arg {
            ClusterTypeArg::Sno => ClusterType::SingleNode,
            ClusterTypeArg::Compact => ClusterType::Compact,
            ClusterTypeArg::Ha => ClusterType::MultiHaCluster,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "agent-installer-config",
            "generate",
            "--config",
            "cluster.yaml",
            "--ssh-key-file",
            "a.pub",
            "--ssh-key-file",
            "b.pub",
            "--only",
            "agent",
        ]);

        match cli.command {
            Commands::Generate {
                ssh_key_files,
                only,
                stdout,
                ..
            } => {
                assert_eq!(ssh_key_files.len(), 2);
                assert_eq!(Manifests::from(only), Manifests::AgentOnly);
                assert!(!stdout);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_stdout_conflicts_with_output_dir() {
        let result = Cli::try_parse_from([
            "agent-installer-config",
            "generate",
            "-c",
            "cluster.yaml",
            "-o",
            "out",
            "--stdout",
        ]);
        assert!(result.is_err());
    }
}
