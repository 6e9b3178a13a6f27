//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculate::{PolygonLayoutEngine, Rounding, ScoreNormalizer, DEFAULT_LABEL_OFFSET};
use crate::models::{CategoryDefinition, ScoreRange, Taxonomy, TaxonomyError};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl From<TaxonomyError> for ConfigError {
    fn from(err: TaxonomyError) -> Self {
        ConfigError::ValidationError(err.to_string())
    }
}

/// Score normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Range raw seed scores are read in
    #[serde(default = "default_seed_range")]
    pub seed_range: ScoreRange,

    /// Range scores are shown in
    #[serde(default = "default_display_range")]
    pub display_range: ScoreRange,

    #[serde(default)]
    pub rounding: Rounding,
}

fn default_seed_range() -> ScoreRange {
    ScoreRange::coach_seed()
}

fn default_display_range() -> ScoreRange {
    ScoreRange::coach_display()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            seed_range: default_seed_range(),
            display_range: default_display_range(),
            rounding: Rounding::default(),
        }
    }
}

/// Radar chart canvas settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_canvas_size")]
    pub canvas_size: f64,

    #[serde(default = "default_radius_inset")]
    pub radius_inset: f64,

    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
}

fn default_canvas_size() -> f64 {
    280.0
}

fn default_radius_inset() -> f64 {
    46.0
}

fn default_label_offset() -> f64 {
    DEFAULT_LABEL_OFFSET
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            canvas_size: default_canvas_size(),
            radius_inset: default_radius_inset(),
            label_offset: default_label_offset(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    /// Taxonomy override; empty means the built-in coach taxonomy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryDefinition>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            scoring: ScoringConfig::default(),
            chart: ChartConfig::default(),
            categories: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scoring.seed_range.is_finite() || !self.scoring.display_range.is_finite() {
            return Err(ConfigError::ValidationError(
                "Score ranges must be finite".to_string(),
            ));
        }

        let chart = &self.chart;
        if !(chart.canvas_size.is_finite() && chart.canvas_size > 0.0) {
            return Err(ConfigError::ValidationError(
                "Chart canvas size must be greater than 0".to_string(),
            ));
        }

        if !(chart.radius_inset >= 0.0 && chart.radius_inset < chart.canvas_size / 2.0) {
            return Err(ConfigError::ValidationError(format!(
                "Chart radius inset must be in [0, {})",
                chart.canvas_size / 2.0
            )));
        }

        if !chart.label_offset.is_finite() {
            return Err(ConfigError::ValidationError(
                "Chart label offset must be finite".to_string(),
            ));
        }

        self.taxonomy()?;
        Ok(())
    }

    /// Category taxonomy: the configured override, or the coach default.
    pub fn taxonomy(&self) -> Result<Taxonomy, ConfigError> {
        if self.categories.is_empty() {
            return Ok(Taxonomy::coach_default());
        }
        Ok(Taxonomy::new(self.categories.clone())?)
    }

    pub fn normalizer(&self) -> ScoreNormalizer {
        ScoreNormalizer::new(self.scoring.seed_range, self.scoring.display_range)
            .with_rounding(self.scoring.rounding)
    }

    pub fn layout_engine(&self) -> PolygonLayoutEngine {
        PolygonLayoutEngine::new(
            self.chart.canvas_size,
            self.chart.radius_inset,
            self.chart.label_offset,
        )
    }
}
