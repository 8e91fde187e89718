// file: src/main.rs
// version: 2.0.0
// guid: 0b5d8e27-4a16-4c93-bf72-6e3a1d9c8f05

//! agent-installer-config - Main entry point

use agent_installer_config::{
    cli::{
        args::{Cli, Commands},
        commands::*,
    },
    logging::logger,
};
use anyhow::Context;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_logger(cli.verbose, cli.quiet, cli.log_json)?;

    match cli.command {
        Commands::Generate {
            config,
            output_dir,
            ssh_key_files,
            only,
            stdout,
        } => generate_command(&config, output_dir, &ssh_key_files, only.into(), stdout)
            .await
            .with_context(|| format!("Failed to generate manifests from {}", config.display())),
        Commands::Validate { config } => validate_command(&config)
            .await
            .with_context(|| format!("Validation failed for {}", config.display())),
        Commands::Init {
            cluster_type,
            output,
        } => init_command(cluster_type.into(), output)
            .await
            .context("Failed to write starter definition"),
    }
}
