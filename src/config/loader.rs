//! Configuration loading and merging logic
//!
//! Handles loading configuration from the config file and the environment,
//! merged according to precedence rules.

use super::{defaults, palette::Palette, paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Overrides `hubClusterName`
pub const HUB_CLUSTER_ENV: &str = "FLEETPULSE_HUB_CLUSTER";
/// Overrides `status.zeroDesiredReplicas`
pub const ZERO_DESIRED_ENV: &str = "FLEETPULSE_ZERO_DESIRED";
/// Overrides `output.format`
pub const OUTPUT_ENV: &str = "FLEETPULSE_OUTPUT";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file in `config_dir` (or the default config directory)
    /// 3. Built-in defaults
    pub fn load(config_dir: Option<&Path>) -> Result<Config> {
        let mut config = Self::load_defaults();

        let root_path = paths::root_config_path(config_dir);
        if root_path.exists() {
            let root_config = Self::load_file(&root_path)?;
            config = Self::merge_config(config, root_config);
        } else {
            debug!(path = %root_path.display(), "No config file, using defaults");
        }

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration by loading and checking for errors
    ///
    /// Fails on invalid YAML syntax, invalid value types, unreadable files,
    /// an empty hub cluster name, or palette entries that are not colors.
    pub fn validate(config_dir: Option<&Path>) -> Result<()> {
        let config = Self::load(config_dir).context("Failed to load merged configuration")?;
        Self::check(&config)
    }

    /// Check semantic constraints serde cannot express
    pub fn check(config: &Config) -> Result<()> {
        if config.hub_cluster_name.trim().is_empty() {
            return Err(anyhow::anyhow!("hubClusterName must not be empty"));
        }
        Palette::from_config(&config.output.palette)?;
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Merge two configurations, with `other` taking precedence
    ///
    /// Missing keys in a file are filled by serde defaults, so the file layer
    /// replaces the base wholesale.
    fn merge_config(_base: Config, other: Config) -> Config {
        Config {
            hub_cluster_name: other.hub_cluster_name,
            status: other.status,
            output: other.output,
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// Apply overrides from any variable source; unparsable values are ignored
    pub fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(hub) = lookup(HUB_CLUSTER_ENV) {
            if !hub.trim().is_empty() {
                config.hub_cluster_name = hub.trim().to_string();
            }
        }

        if let Some(policy) = lookup(ZERO_DESIRED_ENV) {
            match policy.parse() {
                Ok(policy) => config.status.zero_desired_replicas = policy,
                Err(e) => debug!(error = %e, "Ignoring {}", ZERO_DESIRED_ENV),
            }
        }

        if let Some(format) = lookup(OUTPUT_ENV) {
            match format.parse() {
                Ok(format) => config.output.format = format,
                Err(e) => debug!(error = %e, "Ignoring {}", OUTPUT_ENV),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config, config_dir: Option<&Path>) -> Result<()> {
        Self::save(config, &paths::root_config_path(config_dir))
    }
}
