//! Configuration management for the Tagnet CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tagnet_core::prelude::*;

/// Tagnet project configuration, read from `tagnet.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub layout: LayoutSection,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: String,
    #[serde(default = "default_tag_column")]
    pub tag_column: String,
    /// Tags dropped during extraction. When absent the built-in
    /// business-model blocklist applies.
    #[serde(default)]
    pub blocklist: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    #[serde(default)]
    pub seed: u64,
    /// Minimum edge weight for the overall network view.
    #[serde(default = "default_overall_threshold")]
    pub overall_threshold: u32,
    /// Fallback minimum edge weight for per-community views.
    #[serde(default = "default_community_threshold")]
    pub community_threshold_default: u32,
    /// Per-community threshold overrides, keyed by community id.
    /// TOML table keys are strings, so ids are too.
    #[serde(default)]
    pub community_thresholds: HashMap<String, u32>,
    /// Communities with fewer laid-out nodes than this are skipped.
    #[serde(default = "default_min_nodes")]
    pub min_community_nodes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSection {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Ideal edge length; defaults to 1/sqrt(n) when unset.
    #[serde(default)]
    pub k: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// How many top tags each community summary lists.
    #[serde(default = "default_top_tags")]
    pub top_tags: usize,
}

// Default value functions
fn default_input_path() -> String { "companies.csv".to_string() }
fn default_tag_column() -> String { "tags".to_string() }
fn default_resolution() -> f64 { 1.0 }
fn default_overall_threshold() -> u32 { 100 }
fn default_community_threshold() -> u32 { 50 }
fn default_min_nodes() -> usize { 1 }
fn default_iterations() -> usize { 80 }
fn default_output_dir() -> String { "output".to_string() }
fn default_top_tags() -> usize { 10 }

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            analysis: AnalysisConfig::default(),
            layout: LayoutSection::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            tag_column: default_tag_column(),
            blocklist: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            seed: 0,
            overall_threshold: default_overall_threshold(),
            community_threshold_default: default_community_threshold(),
            community_thresholds: HashMap::new(),
            min_community_nodes: default_min_nodes(),
        }
    }
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            seed: 0,
            iterations: default_iterations(),
            k: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            top_tags: default_top_tags(),
        }
    }
}

impl AnalysisConfig {
    /// Effective threshold for one community: its override if present,
    /// otherwise the default.
    pub fn threshold_for(&self, id: CommunityId) -> u32 {
        self.community_thresholds
            .get(&id.to_string())
            .copied()
            .unwrap_or(self.community_threshold_default)
    }

    pub fn louvain(&self) -> LouvainConfig {
        LouvainConfig {
            resolution: self.resolution,
            seed: self.seed,
            ..LouvainConfig::default()
        }
    }
}

impl LayoutSection {
    pub fn to_layout(&self) -> LayoutConfig {
        LayoutConfig {
            seed: self.seed,
            iterations: self.iterations,
            k: self.k,
        }
    }
}

impl Config {
    /// Load config from an explicit path, or from tagnet.toml in the
    /// current or parent directories. Falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };
        if let Some(path) = path {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Extractor built from the configured blocklist.
    pub fn extractor(&self) -> TagExtractor {
        match &self.input.blocklist {
            Some(tags) => TagExtractor::with_blocklist(tags.iter().cloned()),
            None => TagExtractor::with_default_blocklist(),
        }
    }
}

/// Find tagnet.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join("tagnet.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_thresholds() {
        let config = Config::default();
        assert_eq!(config.analysis.overall_threshold, 100);
        assert_eq!(config.analysis.community_threshold_default, 50);
        assert_eq!(config.analysis.threshold_for(42), 50);
        assert_eq!(config.layout.iterations, 80);
    }

    #[test]
    fn overrides_win_over_the_default_threshold() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            community_threshold_default = 50

            [analysis.community_thresholds]
            1 = 30
            3 = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.threshold_for(1), 30);
        assert_eq!(config.analysis.threshold_for(3), 5);
        assert_eq!(config.analysis.threshold_for(2), 50);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [input]
            path = "data/firms.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.input.path, "data/firms.csv");
        assert_eq!(config.input.tag_column, "tags");
        assert_eq!(config.analysis.resolution, 1.0);
    }
}
