//! Configuration system for fleetpulse
//!
//! A single YAML file in the config directory, layered over built-in defaults
//! and under environment variable overrides.

mod defaults;
pub mod loader;
pub mod palette;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use palette::Palette;
pub use schema::{Config, OutputConfig, OutputFormat, PaletteConfig, StatusConfig};

use crate::status::StatusContext;

/// Every key accepted by [`get_config_value`] and [`set_config_value`]
pub const CONFIG_KEYS: &[&str] = &[
    "hubClusterName",
    "status.zeroDesiredReplicas",
    "output.format",
    "output.color",
    "output.palette.green",
    "output.palette.yellow",
    "output.palette.orange",
    "output.palette.red",
];

impl Config {
    /// Classifier inputs derived from this configuration
    pub fn status_context(&self) -> StatusContext {
        StatusContext::new(self.hub_cluster_name.clone())
            .with_zero_desired(self.status.zero_desired_replicas)
    }
}

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "hubClusterName" => Ok(config.hub_cluster_name.clone()),
        "status.zeroDesiredReplicas" => Ok(config.status.zero_desired_replicas.to_string()),
        "output.format" => Ok(config.output.format.to_string()),
        "output.color" => Ok(config.output.color.to_string()),
        "output.palette.green" => Ok(config.output.palette.green.clone()),
        "output.palette.yellow" => Ok(config.output.palette.yellow.clone()),
        "output.palette.orange" => Ok(config.output.palette.orange.clone()),
        "output.palette.red" => Ok(config.output.palette.red.clone()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "hubClusterName" => {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("hubClusterName must not be empty"));
            }
            config.hub_cluster_name = value.trim().to_string();
        }
        "status.zeroDesiredReplicas" => {
            config.status.zero_desired_replicas =
                value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        "output.format" => {
            config.output.format = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        "output.color" => {
            config.output.color = value
                .parse()
                .context("output.color must be 'true' or 'false'")?;
        }
        "output.palette.green" | "output.palette.yellow" | "output.palette.orange"
        | "output.palette.red" => {
            palette::parse_color(value).with_context(|| format!("Invalid value for {}", key))?;
            let palette = &mut config.output.palette;
            let slot = match key {
                "output.palette.green" => &mut palette.green,
                "output.palette.yellow" => &mut palette.yellow,
                "output.palette.orange" => &mut palette.orange,
                _ => &mut palette.red,
            };
            *slot = value.trim().to_string();
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
