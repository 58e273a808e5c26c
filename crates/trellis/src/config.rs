//! Configuration types for the trellis pipeline.
//!
//! This module provides the configuration structures that control extraction
//! filtering and layer layout. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`PipelineConfig`] - Top-level configuration combining extraction and layout settings.
//! - [`ExtractOptions`] - Threshold filtering, symmetric dedup, and focus selection.
//! - [`LayoutOptions`] - Canvas size and marker-based cluster joining.
//! - [`DropPolicy`] / [`KeepPolicy`] - The two filtering policies, parseable
//!   from their lowercase names.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use trellis_core::identifier::Id;

use crate::error::TrellisError;

/// Whether values above or below the threshold are removed.
///
/// `Higher` keeps values strictly below the threshold (the usual reading for
/// p-value style scores); `Lower` keeps values strictly above it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPolicy {
    #[default]
    Higher,
    Lower,
}

impl DropPolicy {
    /// Returns true when `value` survives this policy against `threshold`.
    ///
    /// Comparisons are strict, so NaN never survives.
    pub fn keeps(self, value: f64, threshold: f64) -> bool {
        match self {
            DropPolicy::Higher => value < threshold,
            DropPolicy::Lower => value > threshold,
        }
    }
}

impl FromStr for DropPolicy {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "higher" => Ok(DropPolicy::Higher),
            "lower" => Ok(DropPolicy::Lower),
            _ => Err(TrellisError::Config {
                option: "drop",
                value: s.to_string(),
                expected: "\"higher\" or \"lower\"",
            }),
        }
    }
}

impl fmt::Display for DropPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropPolicy::Higher => write!(f, "higher"),
            DropPolicy::Lower => write!(f, "lower"),
        }
    }
}

/// Tie-break rule for symmetric (r,c)/(c,r) duplicate cell pairs.
///
/// `Lower` keeps the strictly-smaller of the two cells, `Higher` the
/// strictly-larger; equal-valued pairs lose both cells. `Both` disables
/// symmetric deduplication entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepPolicy {
    Higher,
    #[default]
    Lower,
    Both,
}

impl FromStr for KeepPolicy {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "higher" => Ok(KeepPolicy::Higher),
            "lower" => Ok(KeepPolicy::Lower),
            "both" => Ok(KeepPolicy::Both),
            _ => Err(TrellisError::Config {
                option: "keep",
                value: s.to_string(),
                expected: "\"higher\", \"lower\", or \"both\"",
            }),
        }
    }
}

impl fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepPolicy::Higher => write!(f, "higher"),
            KeepPolicy::Lower => write!(f, "lower"),
            KeepPolicy::Both => write!(f, "both"),
        }
    }
}

/// Extraction filtering options.
///
/// `selected` names the focal identifier: extraction filters matrix rows
/// against it and layout centers its cluster. `threshold` and `anti`
/// override the per-dataset metadata when set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractOptions {
    /// Drop policy for threshold filtering.
    #[serde(default)]
    drop: DropPolicy,

    /// Keep policy for symmetric duplicate pairs.
    #[serde(default)]
    keep: KeepPolicy,

    /// Focal identifier to filter and center on.
    #[serde(default)]
    selected: Option<Id>,

    /// Threshold override applied to every dataset.
    #[serde(default)]
    threshold: Option<f64>,

    /// Anti-association override applied to every dataset.
    #[serde(default)]
    anti: Option<bool>,
}

impl ExtractOptions {
    /// Creates extraction options with the given policies and no overrides.
    pub fn new(drop: DropPolicy, keep: KeepPolicy) -> Self {
        Self {
            drop,
            keep,
            ..Self::default()
        }
    }

    /// Sets the drop policy.
    pub fn with_drop(mut self, drop: DropPolicy) -> Self {
        self.drop = drop;
        self
    }

    /// Sets the keep policy.
    pub fn with_keep(mut self, keep: KeepPolicy) -> Self {
        self.keep = keep;
        self
    }

    /// Sets the focal identifier.
    pub fn with_selected(mut self, selected: Id) -> Self {
        self.selected = Some(selected);
        self
    }

    /// Sets the threshold override.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Sets the anti-association override.
    pub fn with_anti(mut self, anti: bool) -> Self {
        self.anti = Some(anti);
        self
    }

    /// Returns the drop policy.
    pub fn drop(&self) -> DropPolicy {
        self.drop
    }

    /// Returns the keep policy.
    pub fn keep(&self) -> KeepPolicy {
        self.keep
    }

    /// Returns the focal identifier, if any.
    pub fn selected(&self) -> Option<Id> {
        self.selected
    }

    /// Returns the threshold override, if any.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Returns the anti-association override, if any.
    pub fn anti(&self) -> Option<bool> {
        self.anti
    }
}

fn default_canvas() -> f64 {
    1000.0
}

/// Layer layout options.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutOptions {
    /// Canvas width the layers are spread across.
    #[serde(default = "default_canvas")]
    width: f64,

    /// Canvas height each layer's members fan out over.
    #[serde(default = "default_canvas")]
    height: f64,

    /// Ordered marker substrings; clusters sharing a marker are joined.
    #[serde(default)]
    join_markers: Vec<String>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: default_canvas(),
            height: default_canvas(),
            join_markers: Vec::new(),
        }
    }
}

impl LayoutOptions {
    /// Creates layout options with the given canvas size and no markers.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            join_markers: Vec::new(),
        }
    }

    /// Sets the ordered marker substrings.
    pub fn with_join_markers(mut self, join_markers: Vec<String>) -> Self {
        self.join_markers = join_markers;
        self
    }

    /// Returns the canvas width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the canvas height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the ordered marker substrings.
    pub fn join_markers(&self) -> &[String] {
        &self.join_markers
    }
}

/// Top-level pipeline configuration combining extraction and layout settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    /// Extraction configuration section.
    #[serde(default)]
    extract: ExtractOptions,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutOptions,
}

impl PipelineConfig {
    /// Creates a new [`PipelineConfig`] from its sections.
    pub fn new(extract: ExtractOptions, layout: LayoutOptions) -> Self {
        Self { extract, layout }
    }

    /// Returns the extraction configuration.
    pub fn extract(&self) -> &ExtractOptions {
        &self.extract
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("higher".parse::<DropPolicy>().unwrap(), DropPolicy::Higher);
        assert_eq!("lower".parse::<DropPolicy>().unwrap(), DropPolicy::Lower);
        assert_eq!("both".parse::<KeepPolicy>().unwrap(), KeepPolicy::Both);

        let err = "sideways".parse::<DropPolicy>().unwrap_err();
        assert!(err.to_string().contains("sideways"));

        let err = "neither".parse::<KeepPolicy>().unwrap_err();
        assert!(err.to_string().contains("neither"));
    }

    #[test]
    fn test_drop_policy_keeps() {
        assert!(DropPolicy::Higher.keeps(0.01, 0.05));
        assert!(!DropPolicy::Higher.keeps(0.05, 0.05));
        assert!(!DropPolicy::Higher.keeps(0.10, 0.05));

        assert!(DropPolicy::Lower.keeps(0.10, 0.05));
        assert!(!DropPolicy::Lower.keeps(0.05, 0.05));
        assert!(!DropPolicy::Lower.keeps(0.01, 0.05));

        assert!(!DropPolicy::Higher.keeps(f64::NAN, 0.05));
        assert!(!DropPolicy::Lower.keeps(f64::NAN, 0.05));
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();

        assert_eq!(config.extract().drop(), DropPolicy::Higher);
        assert_eq!(config.extract().keep(), KeepPolicy::Lower);
        assert_eq!(config.extract().selected(), None);
        assert_eq!(config.layout().width(), 1000.0);
        assert_eq!(config.layout().height(), 1000.0);
        assert!(config.layout().join_markers().is_empty());
    }
}
