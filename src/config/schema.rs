//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use crate::status::{DEFAULT_HUB_CLUSTER, ZeroDesiredPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Name of the hub cluster
    #[serde(default = "default_hub_cluster_name")]
    pub hub_cluster_name: String,

    /// Status classification settings
    #[serde(default)]
    pub status: StatusConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Status classification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusConfig {
    /// How a resource scaled to zero replicas is classified
    #[serde(default)]
    pub zero_desired_replicas: ZeroDesiredPolicy,
}

/// Output format of the CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Invalid output format: {}. Must be one of: text, json, yaml",
                s
            )),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Color pulse names in text output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Colors used for each pulse
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// CSS colors for the four pulses; `default` keeps the terminal color
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaletteConfig {
    #[serde(default = "default_green")]
    pub green: String,
    #[serde(default = "default_yellow")]
    pub yellow: String,
    #[serde(default = "default_orange")]
    pub orange: String,
    #[serde(default = "default_red")]
    pub red: String,
}

// Default value functions
fn default_hub_cluster_name() -> String {
    DEFAULT_HUB_CLUSTER.to_string()
}

fn default_true() -> bool {
    true
}

fn default_green() -> String {
    "#3e8635".to_string()
}

fn default_yellow() -> String {
    "#f0ab00".to_string()
}

fn default_orange() -> String {
    "#ec7a08".to_string()
}

fn default_red() -> String {
    "#c9190b".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hub_cluster_name: default_hub_cluster_name(),
            status: StatusConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: default_true(),
            palette: PaletteConfig::default(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            green: default_green(),
            yellow: default_yellow(),
            orange: default_orange(),
            red: default_red(),
        }
    }
}
