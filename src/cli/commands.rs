//! CLI command handlers

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use std::path::Path;

use fleetpulse::config::{self, paths, Config, ConfigLoader, OutputFormat, Palette};
use fleetpulse::details::{node_details, ActiveFilters, DetailContext, InterpolatingTranslator};
use fleetpulse::models::PulseStatus;
use fleetpulse::render::{render_details, render_statuses, NodeStatus, TextStyle};
use fleetpulse::status::compute_node_status;
use fleetpulse::topology::TopologyDocument;

/// Output options shared by the topology commands
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format (text, json, yaml); defaults to output.format
    #[arg(long, short = 'o')]
    pub output: Option<OutputFormat>,

    /// Disable colors in text output
    #[arg(long)]
    pub no_color: bool,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "hubClusterName", "output.format")
        key: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key (e.g., "hubClusterName", "output.format")
        key: String,
        /// Configuration value
        value: String,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

fn load_config(config_dir: Option<&Path>) -> Result<Config> {
    ConfigLoader::load(config_dir).context("Failed to load configuration")
}

fn text_style(config: &Config, output: &OutputArgs) -> Result<TextStyle> {
    Ok(TextStyle {
        color: config.output.color && !output.no_color,
        palette: Palette::from_config(&config.output.palette)?,
    })
}

/// Hub cluster of the document, else the configured one
fn hub_cluster(config: &Config, document: &TopologyDocument) -> String {
    document
        .hub_cluster_name
        .clone()
        .filter(|hub| !hub.trim().is_empty())
        .unwrap_or_else(|| config.hub_cluster_name.clone())
}

fn load_topology(file: &Path) -> Result<TopologyDocument> {
    TopologyDocument::load(file)
        .with_context(|| format!("Failed to load topology: {}", file.display()))
}

/// Print the pulse of every node, or of one node
pub fn handle_status_command(
    config_dir: Option<&Path>,
    file: &Path,
    node: Option<&str>,
    output: &OutputArgs,
) -> Result<()> {
    let config = load_config(config_dir)?;
    let document = load_topology(file)?;

    let mut ctx = config.status_context();
    ctx.hub_cluster = hub_cluster(&config, &document);

    let statuses: Vec<NodeStatus> = match node {
        Some(id) => {
            let found = document
                .find_node(id)
                .ok_or_else(|| anyhow::anyhow!("Node not found: {}", id))?;
            vec![NodeStatus::new(found, compute_node_status(Some(found), &ctx))]
        }
        None => document
            .nodes
            .iter()
            .map(|n| NodeStatus::new(n, compute_node_status(Some(n), &ctx)))
            .collect(),
    };

    let format = output.output.unwrap_or(config.output.format);
    print!(
        "{}",
        render_statuses(&statuses, format, &text_style(&config, output)?)?
    );
    Ok(())
}

/// Print the detail panel of one node
pub fn handle_details_command(
    config_dir: Option<&Path>,
    file: &Path,
    node: &str,
    filter: &[PulseStatus],
    now: Option<&str>,
    output: &OutputArgs,
) -> Result<()> {
    let config = load_config(config_dir)?;
    let document = load_topology(file)?;
    let found = document
        .find_node(node)
        .ok_or_else(|| anyhow::anyhow!("Node not found: {}", node))?;

    let now = match now {
        Some(value) => DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("Invalid --now timestamp: {}", value))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let translator = InterpolatingTranslator;
    let ctx = DetailContext::new(&translator, now)
        .with_hub_cluster(hub_cluster(&config, &document))
        .with_zero_desired(config.status.zero_desired_replicas);
    let filters = ActiveFilters::new(filter.iter().copied());
    let rows = node_details(found, &filters, &ctx);
    tracing::debug!(node = %found.name, rows = rows.len(), "details built");

    let format = output.output.unwrap_or(config.output.format);
    print!(
        "{}",
        render_details(&rows, format, &text_style(&config, output)?)?
    );
    Ok(())
}

/// Handle configuration subcommands
pub fn handle_config_command(config_dir: Option<&Path>, cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key } => {
            let config = load_config(config_dir)?;

            if let Some(key) = key {
                let value = config::get_config_value(&config, &key)?;
                println!("{}", value);
            } else {
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Set { key, value } => {
            // Environment overrides are not persisted
            let path = paths::root_config_path(config_dir);
            let mut config = if path.exists() {
                ConfigLoader::load_file(&path)?
            } else {
                ConfigLoader::load_defaults()
            };

            config::set_config_value(&mut config, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            ConfigLoader::save_root(&config, config_dir).context("Failed to save configuration")?;
            println!("Configuration saved");
        }
        ConfigSubcommand::List => {
            let config = load_config(config_dir)?;
            for key in config::CONFIG_KEYS {
                println!("{} = {}", key, config::get_config_value(&config, key)?);
            }
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path(config_dir).display());
        }
        ConfigSubcommand::Validate => match ConfigLoader::validate(config_dir) {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration validation failed: {:#}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
