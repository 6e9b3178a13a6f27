//! Converter mapping file.
//!
//! A JSON document describing which vendor CSV exports to read, which
//! columns become metrics, and how categories and detail sections are
//! derived from them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::IngestError;
use crate::calculate::Rounding;
use crate::models::{EventInfo, ScoreRange};

/// Vendor export format; selects the timestamp parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// ISO-8601 timestamps in one column
    Photon,
    /// `%m/%d/%Y` date column plus optional `%H:%M:%S` time column
    Hawkin,
}

/// Per-player row selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSelect {
    /// Only the most recent row
    Latest,
}

/// How several rows for one player are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    #[default]
    Avg,
    Min,
    Max,
    /// Unknown aggregate names fall back to the average
    #[serde(other)]
    Other,
}

impl Aggregate {
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(match self {
            Aggregate::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregate::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Avg | Aggregate::Other => values.iter().sum::<f64>() / values.len() as f64,
        })
    }
}

/// Value transform applied after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    Abs,
}

/// A CSV column exported as a metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricMapping {
    pub column: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub transform: Option<Transform>,
}

/// One vendor CSV export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMapping {
    pub path: PathBuf,

    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Lines to drop before the header row
    #[serde(default)]
    pub header_skip: usize,

    pub player_field: String,

    #[serde(default)]
    pub date_field: Option<String>,

    #[serde(default)]
    pub time_field: Option<String>,

    #[serde(default)]
    pub position_field: Option<String>,

    #[serde(default)]
    pub format: Option<SourceFormat>,

    /// `None` keeps every row of a player
    #[serde(default)]
    pub row_select: Option<RowSelect>,

    /// `None` reads the first kept row instead of aggregating
    #[serde(default)]
    pub aggregate: Option<Aggregate>,

    #[serde(default)]
    pub metrics: BTreeMap<String, MetricMapping>,
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl SourceMapping {
    pub fn delimiter_byte(&self) -> Result<u8, IngestError> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => Err(IngestError::Validation(format!(
                "Delimiter must be a single byte, got {:?}",
                self.delimiter
            ))),
        }
    }
}

/// Which way a category metric is ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

/// A scored category derived from one source metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub id: String,
    pub label: String,
    pub source: String,
    pub metric_id: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub vendor: Option<String>,
}

/// A detail section listing source metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionMapping {
    pub id: String,
    pub title: String,
    pub source: String,
    pub metric_ids: Vec<String>,
    #[serde(default)]
    pub vendor: Option<String>,
}

/// The full converter mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub event: Option<EventInfo>,

    /// Raw CSV name to canonical player name
    #[serde(default)]
    pub name_aliases: BTreeMap<String, String>,

    #[serde(default)]
    pub sources: BTreeMap<String, SourceMapping>,

    #[serde(default)]
    pub score_range: ScoreRange,

    #[serde(default)]
    pub score_rounding: Rounding,

    #[serde(default)]
    pub categories: Vec<CategoryMapping>,

    #[serde(default)]
    pub sections: Vec<SectionMapping>,
}

impl MappingConfig {
    /// Load a mapping file. Relative source paths are resolved against the
    /// mapping file's directory.
    pub fn from_file(path: &Path) -> Result<Self, IngestError> {
        let contents = std::fs::read_to_string(path)?;
        let mut mapping: MappingConfig = serde_json::from_str(&contents)?;
        if let Some(base) = path.parent() {
            mapping.resolve_paths(base);
        }
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        for source in self.sources.values_mut() {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }

    /// Canonical name for a raw CSV name.
    pub fn canonical_name(&self, raw: &str) -> String {
        let key = raw.trim();
        self.name_aliases
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub(super) fn metric_of(&self, source_id: &str, metric_id: &str) -> Result<&MetricMapping, IngestError> {
        let source = self
            .sources
            .get(source_id)
            .ok_or_else(|| IngestError::MissingSource(source_id.to_string()))?;
        source
            .metrics
            .get(metric_id)
            .ok_or_else(|| IngestError::MissingMetric {
                source_id: source_id.to_string(),
                metric_id: metric_id.to_string(),
            })
    }

    /// Check every category and section references a declared metric.
    pub fn validate(&self) -> Result<(), IngestError> {
        if !self.score_range.is_finite() {
            return Err(IngestError::Validation(
                "Score range must be finite".to_string(),
            ));
        }
        for source in self.sources.values() {
            source.delimiter_byte()?;
        }
        for category in &self.categories {
            self.metric_of(&category.source, &category.metric_id)?;
        }
        for section in &self.sections {
            for metric_id in &section.metric_ids {
                self.metric_of(&section.source, metric_id)?;
            }
        }
        Ok(())
    }
}
