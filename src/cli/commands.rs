// file: src/cli/commands.rs
// version: 2.0.0
// guid: 7e2b9d14-6c58-4a3f-8b07-e1f4c9a06d52

//! Command implementations for the CLI

use crate::{
    config::{
        loader::{read_ssh_key_files, ConfigLoader},
        validator::{is_networking_valid, validate_config, Severity, ValidationReport},
        ClusterConfig, ClusterPatch, ClusterType, Session,
    },
    error::WizardError,
    generator::{render_agent_config, render_install_config, write_manifests, Manifests},
    logging::{with_async_operation_span, with_operation_span},
    Result,
};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load a definition and render its manifests
pub async fn generate_command(
    config_path: &Path,
    output_dir: Option<PathBuf>,
    ssh_key_files: &[PathBuf],
    manifests: Manifests,
    to_stdout: bool,
) -> Result<()> {
    info!("Generating manifests from {}", config_path.display());

    let config = load_with_keys(config_path, ssh_key_files).await?;

    for issue in validate_config(&config).errors() {
        warn!("{}", issue);
    }

    if to_stdout {
        let documents = with_operation_span("render_manifests", || -> Result<Vec<String>> {
            let mut documents = Vec::new();
            if manifests.includes_install() {
                documents.push(render_install_config(&config)?);
            }
            if manifests.includes_agent() {
                documents.push(render_agent_config(&config)?);
            }
            Ok(documents)
        })?;
        print!("{}", documents.join("---\n"));
        return Ok(());
    }

    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
    let written = with_async_operation_span("write_manifests", || {
        write_manifests(&config, &output_dir, manifests)
    })
    .await?;

    info!("Generated {} manifests in {}", written.len(), output_dir.display());
    Ok(())
}

/// Load a definition, merging in keys read from `ssh_key_files`
async fn load_with_keys(config_path: &Path, ssh_key_files: &[PathBuf]) -> Result<ClusterConfig> {
    let config = ConfigLoader::new().load_cluster_config(config_path)?;
    if ssh_key_files.is_empty() {
        return Ok(config);
    }

    let extra = read_ssh_key_files(ssh_key_files).await?;
    let mut keys = config.ssh_public_keys.clone();
    keys.extend(extra.into_iter().filter(|key| !config.ssh_public_keys.contains(key)));

    let mut session = Session::with_config(config);
    let updated = session.patch(ClusterPatch {
        ssh_public_keys: Some(keys),
        ..ClusterPatch::default()
    });
    Ok((*updated).clone())
}

/// Check a definition and print a report; problems make the command fail
pub async fn validate_command(config_path: &Path) -> Result<()> {
    info!("Validating cluster definition: {}", config_path.display());

    let config = ConfigLoader::new().load_cluster_config(config_path)?;
    let report = validate_config(&config);
    let networking_ok = is_networking_valid(&config);

    print_report(config_path, &report, networking_ok);

    let problems = report.errors().count() + usize::from(!networking_ok);
    if problems > 0 {
        return Err(WizardError::validation(format!(
            "{} problem{} found in {}",
            problems,
            if problems == 1 { "" } else { "s" },
            config_path.display()
        )));
    }

    Ok(())
}

fn print_report(config_path: &Path, report: &ValidationReport, networking_ok: bool) {
    println!("Cluster definition: {}", config_path.display());

    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        println!("  {} {}: {}", label, issue.field.cyan(), issue.message);
    }

    if networking_ok {
        println!("  {} networking settings complete", "ok".green().bold());
    } else {
        println!(
            "  {} networking settings incomplete (VIPs, DNS servers or machine networks)",
            "error".red().bold()
        );
    }

    if !report.has_errors() && networking_ok {
        println!("{}", "Definition is valid".green());
    }
}

/// Write a starter definition for the given topology
pub async fn init_command(cluster_type: ClusterType, output: Option<PathBuf>) -> Result<()> {
    let yaml = starter_definition(cluster_type)?;

    match output {
        Some(path) => {
            if path.exists() {
                return Err(WizardError::config(format!(
                    "Refusing to overwrite existing file: {}",
                    path.display()
                )));
            }
            tokio::fs::write(&path, yaml).await?;
            info!("Starter definition written to: {}", path.display());
        }
        None => print!("{}", yaml),
    }

    Ok(())
}

/// Default definition with placeholder identity for `cluster_type`
pub fn starter_definition(cluster_type: ClusterType) -> Result<String> {
    let config = ClusterConfig {
        cluster_name: "my-cluster".to_string(),
        cluster_domain: "example.com".to_string(),
        cluster_type,
        ..ClusterConfig::default()
    }
    .normalized();

    Ok(serde_yaml::to_string(&config)?)
}
