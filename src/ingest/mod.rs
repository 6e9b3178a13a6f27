//! CSV to report document conversion.
//!
//! Reads the vendor CSV exports named in a mapping file, keeps one set of
//! metrics per player and source, then scores categories by min-max
//! scaling across players into the mapping's score range.

pub mod mapping;
pub mod rows;

pub use mapping::MappingConfig;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::ScoreNormalizer;
use crate::models::{
    Player, PlayerId, RawMetric, ReportCategory, ReportDocument, ReportSection, ScoreRange,
    SectionMetric,
};
use crate::storage::{ReportStore, StorageError};
use mapping::{CategoryMapping, Direction, SectionMapping};
use rows::{MetricValue, PlayerRows};

/// Errors raised while converting CSV exports.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown source: {0}")]
    MissingSource(String),

    #[error("Unknown metric {metric_id} in source {source_id}")]
    MissingMetric { source_id: String, metric_id: String },

    #[error("Invalid mapping: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Metrics per source, then per player name.
type SourceMetrics = BTreeMap<String, BTreeMap<String, BTreeMap<String, MetricValue>>>;

#[derive(Debug, Default)]
struct PlayerMeta {
    measured_at: Option<NaiveDateTime>,
    position: Option<String>,
}

/// Score and rank one category across players.
///
/// Values are min-max scaled into the display range of `normalizer`;
/// lower-is-better metrics use the reversed span. When every value is equal the midpoint is used.
/// Ranks run 1..n over players with a value, best first, ties in name
/// order.
pub fn score_values(
    values: &BTreeMap<String, Option<f64>>,
    direction: Direction,
    normalizer: ScoreNormalizer,
) -> BTreeMap<String, (Option<i32>, Option<u32>)> {
    let present: Vec<(&String, f64)> = values
        .iter()
        .filter_map(|(name, v)| v.filter(|v| v.is_finite()).map(|v| (name, v)))
        .collect();

    let mut result: BTreeMap<String, (Option<i32>, Option<u32>)> =
        values.keys().map(|name| (name.clone(), (None, None))).collect();
    if present.is_empty() {
        return result;
    }

    let min_v = present.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max_v = present.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let seed = match direction {
        Direction::HigherIsBetter => ScoreRange::new(min_v, max_v),
        Direction::LowerIsBetter => ScoreRange::new(max_v, min_v),
    };
    let normalizer = normalizer.with_seed(seed);

    let mut ranked = present.clone();
    ranked.sort_by(|a, b| match direction {
        Direction::HigherIsBetter => b.1.total_cmp(&a.1),
        Direction::LowerIsBetter => a.1.total_cmp(&b.1),
    });

    for (name, value) in &present {
        if let Some(entry) = result.get_mut(*name) {
            entry.0 = Some(normalizer.normalize(*value));
        }
    }
    for (i, (name, _)) in ranked.iter().enumerate() {
        if let Some(entry) = result.get_mut(*name) {
            entry.1 = Some(i as u32 + 1);
        }
    }
    result
}

/// Display string written into detail sections.
fn display_value(value: Option<f64>, unit: Option<&str>) -> Option<String> {
    let value = value?;
    Some(match unit {
        Some(unit) if !unit.is_empty() && unit != "vendor" => format!("{} {}", value, unit),
        _ => format!("{}", value),
    })
}

/// Converts vendor CSV exports into a report document.
pub struct Converter {
    mapping: MappingConfig,
}

impl Converter {
    pub fn new(mapping: MappingConfig) -> Self {
        Self { mapping }
    }

    pub fn from_file(path: &Path) -> Result<Self, IngestError> {
        Ok(Self::new(MappingConfig::from_file(path)?))
    }

    pub fn mapping(&self) -> &MappingConfig {
        &self.mapping
    }

    fn read_sources(&self) -> Result<(SourceMetrics, BTreeMap<String, PlayerMeta>), IngestError> {
        let mut by_source: SourceMetrics = BTreeMap::new();
        let mut meta: BTreeMap<String, PlayerMeta> = BTreeMap::new();

        for (source_id, source) in &self.mapping.sources {
            let rows = rows::read_rows(source)?;
            if rows.is_empty() {
                warn!("Source {} has no data rows", source_id);
            }
            let selected = rows::select_rows(rows, source, &self.mapping);
            info!("Source {}: {} players", source_id, selected.len());

            let per_player = by_source.entry(source_id.clone()).or_default();
            for (name, PlayerRows { timestamp, rows }) in selected {
                let metrics = match source.aggregate {
                    Some(aggregate) => rows::aggregate_metrics(&rows, &source.metrics, aggregate),
                    None => rows::extract_metrics(&rows, &source.metrics),
                };

                let entry = meta.entry(name.clone()).or_default();
                if timestamp > entry.measured_at {
                    entry.measured_at = timestamp;
                }
                if let Some(field) = source.position_field.as_deref() {
                    let position = rows
                        .iter()
                        .filter_map(|r| r.get(field))
                        .map(|p| p.trim())
                        .find(|p| !p.is_empty());
                    if let Some(position) = position {
                        entry.position = Some(position.to_string());
                    }
                }

                per_player.insert(name, metrics);
            }
        }
        Ok((by_source, meta))
    }

    fn metric_value(by_source: &SourceMetrics, source_id: &str, name: &str, metric_id: &str) -> MetricValue {
        by_source
            .get(source_id)
            .and_then(|players| players.get(name))
            .and_then(|metrics| metrics.get(metric_id))
            .copied()
            .unwrap_or_default()
    }

    fn score_categories(
        &self,
        by_source: &SourceMetrics,
        names: &BTreeSet<String>,
    ) -> BTreeMap<String, BTreeMap<String, (Option<i32>, Option<u32>)>> {
        let template = ScoreNormalizer::new(ScoreRange::default(), self.mapping.score_range)
            .with_rounding(self.mapping.score_rounding);

        self.mapping
            .categories
            .iter()
            .map(|category: &CategoryMapping| {
                let values = names
                    .iter()
                    .map(|name| {
                        let value = Self::metric_value(by_source, &category.source, name, &category.metric_id);
                        (name.clone(), value.value)
                    })
                    .collect();
                (
                    category.id.clone(),
                    score_values(&values, category.direction, template),
                )
            })
            .collect()
    }

    fn build_section(&self, section: &SectionMapping, by_source: &SourceMetrics, name: &str) -> Result<ReportSection, IngestError> {
        let metrics = section
            .metric_ids
            .iter()
            .map(|metric_id| {
                let def = self.mapping.metric_of(&section.source, metric_id)?;
                let value = Self::metric_value(by_source, &section.source, name, metric_id);
                Ok(SectionMetric {
                    id: metric_id.clone(),
                    label: def.label.clone().unwrap_or_else(|| metric_id.clone()),
                    value: value.value,
                    unit: def.unit.clone(),
                    display: display_value(value.value, def.unit.as_deref()),
                    raw: value.raw,
                })
            })
            .collect::<Result<Vec<_>, IngestError>>()?;

        Ok(ReportSection {
            id: section.id.clone(),
            title: section.title.clone(),
            vendor: section.vendor.clone(),
            metrics,
        })
    }

    /// Build a report document stamped with `generated_at`.
    pub fn convert_at(&self, generated_at: &str) -> Result<ReportDocument, IngestError> {
        let (by_source, meta) = self.read_sources()?;
        let names: BTreeSet<String> = by_source
            .values()
            .flat_map(|players| players.keys().cloned())
            .collect();
        let scores = self.score_categories(&by_source, &names);

        let mut players = Vec::with_capacity(names.len());
        for name in &names {
            let mut player = Player::new(PlayerId::from_name(name), name.clone());
            if let Some(m) = meta.get(name) {
                player.position = m.position.clone();
                player.measured_at = m
                    .measured_at
                    .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
            }

            for (source_id, per_player) in &by_source {
                let Some(metrics) = per_player.get(name) else {
                    continue;
                };
                let units = &self.mapping.sources[source_id].metrics;
                let block = player.metrics.entry(source_id.clone()).or_default();
                for (metric_id, value) in metrics {
                    block.insert(
                        metric_id.clone(),
                        RawMetric {
                            value: value.value,
                            unit: units.get(metric_id).and_then(|m| m.unit.clone()),
                            raw: value.raw,
                            delta: None,
                        },
                    );
                }
            }

            for category in &self.mapping.categories {
                let (score, rank) = scores
                    .get(&category.id)
                    .and_then(|s| s.get(name))
                    .copied()
                    .unwrap_or((None, None));
                player.categories.push(ReportCategory {
                    id: category.id.clone(),
                    label: category.label.clone(),
                    score: score.map(f64::from),
                    rank,
                    vendor: category.vendor.clone(),
                });
            }

            for section in &self.mapping.sections {
                player.sections.push(self.build_section(section, &by_source, name)?);
            }

            players.push(player);
        }

        info!(
            "Converted {} players across {} sources",
            players.len(),
            by_source.len()
        );

        Ok(ReportDocument {
            event: self.mapping.event.clone(),
            generated_at: generated_at.to_string(),
            score_range: self.mapping.score_range,
            players,
        })
    }

    /// Build a report document stamped with the current time.
    pub fn convert(&self) -> Result<ReportDocument, IngestError> {
        self.convert_at(&Utc::now().to_rfc3339())
    }

    /// Convert and write the document as pretty JSON.
    pub fn convert_to_file(&self, output: &Path) -> Result<ReportDocument, IngestError> {
        let document = self.convert()?;
        ReportStore::write(output, &document)?;
        Ok(document)
    }
}
