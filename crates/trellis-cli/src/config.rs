//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory),
//! plus the CLI-only settings: the default significance threshold and the
//! ordered filename threshold rules applied by the dataset loader.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use trellis::config::PipelineConfig;

use crate::error::CliError;

fn default_threshold() -> f64 {
    0.001
}

/// One filename threshold rule.
///
/// Datasets whose file name contains `pattern` receive `value` as their
/// threshold. Rules apply in order and the last matching rule wins.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdRule {
    pub pattern: String,
    pub value: f64,
}

/// Top-level CLI configuration.
///
/// Wraps the library's [`PipelineConfig`] with the loader settings that only
/// exist at the CLI boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Threshold assigned to datasets no rule matches.
    #[serde(default = "default_threshold")]
    default_threshold: f64,

    /// Ordered filename threshold rules; the last match wins.
    #[serde(default)]
    thresholds: Vec<ThresholdRule>,

    /// Pipeline configuration passed through to the library.
    #[serde(default)]
    pipeline: PipelineConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            thresholds: Vec::new(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl CliConfig {
    /// Returns the default dataset threshold.
    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }

    /// Returns the ordered filename threshold rules.
    pub fn thresholds(&self) -> &[ThresholdRule] {
        &self.thresholds
    }

    /// Returns the pipeline configuration.
    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (trellis/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<CliConfig, CliError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("trellis/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "trellis", "trellis") {
        let system_config = proj_dirs.config_dir().join("config.toml");
        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(&system_config);
        }
    }

    // 4. Fall back to defaults
    debug!("No configuration file found; using defaults");
    Ok(CliConfig::default())
}

fn load_config_file(path: &Path) -> Result<CliConfig, CliError> {
    if !path.exists() {
        return Err(CliError::MissingConfigFile(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| CliError::ConfigParse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use trellis::config::{DropPolicy, KeepPolicy};

    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();

        assert_eq!(config.default_threshold(), 0.001);
        assert!(config.thresholds().is_empty());
        assert_eq!(config.pipeline().extract().drop(), DropPolicy::Higher);
    }

    #[test]
    fn test_parse_full_config() {
        let config: CliConfig = toml::from_str(
            r#"
            default_threshold = 0.01

            [[thresholds]]
            pattern = "expression"
            value = 0.0001

            [[thresholds]]
            pattern = "microbiome"
            value = 0.05

            [pipeline.extract]
            drop = "higher"
            keep = "both"

            [pipeline.layout]
            width = 1200.0
            height = 800.0
            join_markers = ["ENSMUSG", "g__", "ranknorm"]
            "#,
        )
        .unwrap();

        assert_eq!(config.default_threshold(), 0.01);
        assert_eq!(config.thresholds().len(), 2);
        assert_eq!(config.thresholds()[0].pattern, "expression");
        assert_eq!(config.pipeline().extract().keep(), KeepPolicy::Both);
        assert_eq!(config.pipeline().layout().width(), 1200.0);
        assert_eq!(config.pipeline().layout().join_markers().len(), 3);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let result: Result<CliConfig, _> = toml::from_str(
            r#"
            [pipeline.extract]
            drop = "sideways"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_path_errors() {
        let err = load_config(Some("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CliError::MissingConfigFile(_)));
    }
}
