//! Player model and raw vendor measurements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PlayerId, ReportCategory, ReportSection};

/// A single vendor-sourced measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetric {
    /// Measured value, `None` when the vendor export had no usable number
    #[serde(default)]
    pub value: Option<f64>,

    /// Unit label (`"s"`, `"km/h"`, `"vendor"`)
    #[serde(default)]
    pub unit: Option<String>,

    /// Signed raw value, used for left/right balance direction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,

    /// Change since the previous measurement period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<i32>,
}

impl RawMetric {
    /// Create a metric with a value and no unit.
    pub fn value(value: f64) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// Set the delta from the previous period.
    pub fn with_delta(mut self, delta: i32) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Set the unit label.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Coach-assigned status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBadge {
    /// Among the top performers
    Top,
    /// Rapid improvement
    Surging,
    /// Needs attention
    Caution,
}

impl std::fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusBadge::Top => write!(f, "top"),
            StatusBadge::Surging => write!(f, "surging"),
            StatusBadge::Caution => write!(f, "caution"),
        }
    }
}

/// A player in a report snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Player identifier
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Squad number
    #[serde(default)]
    pub number: Option<u32>,

    /// Grade / level label (e.g. "Y3")
    #[serde(default)]
    pub grade: Option<String>,

    /// Half-year term label
    #[serde(default)]
    pub term: Option<String>,

    /// Playing position (GK, DF, MF, FW)
    #[serde(default)]
    pub position: Option<String>,

    /// Date of the latest measurement
    #[serde(default)]
    pub measured_at: Option<String>,

    /// Growth rate over the previous period, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<i32>,

    /// Fatigue warning flag
    #[serde(default)]
    pub fatigue_flag: bool,

    /// Coach-assigned badge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_badge: Option<StatusBadge>,

    /// Pre-scored categories supplied by the report producer
    #[serde(default)]
    pub categories: Vec<ReportCategory>,

    /// Detail sections
    #[serde(default)]
    pub sections: Vec<ReportSection>,

    /// Raw metrics, grouped by vendor source then metric id
    #[serde(default)]
    pub metrics: BTreeMap<String, BTreeMap<String, RawMetric>>,
}

impl Player {
    /// Create a player with only identity fields set.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: None,
            grade: None,
            term: None,
            position: None,
            measured_at: None,
            growth_rate: None,
            fatigue_flag: false,
            status_badge: None,
            categories: Vec::new(),
            sections: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }

    /// Add a raw metric under a vendor source.
    pub fn with_metric(
        mut self,
        source: impl Into<String>,
        metric_id: impl Into<String>,
        metric: RawMetric,
    ) -> Self {
        self.metrics
            .entry(source.into())
            .or_default()
            .insert(metric_id.into(), metric);
        self
    }

    /// Look up a raw metric by id.
    ///
    /// Accepts either a bare metric id, searched across vendor sources in
    /// source-name order (first match wins), or a qualified
    /// `"source.metric"` key.
    pub fn raw_metric(&self, key: &str) -> Option<&RawMetric> {
        if let Some((source, metric_id)) = key.split_once('.') {
            if let Some(metric) = self.metrics.get(source).and_then(|m| m.get(metric_id)) {
                return Some(metric);
            }
        }
        self.metrics.values().find_map(|m| m.get(key))
    }

    /// Returns true if any vendor source reports this metric id.
    pub fn has_metric(&self, key: &str) -> bool {
        self.raw_metric(key).is_some()
    }

    /// Badge to show in lists: the explicit badge, or `Caution` when the
    /// fatigue flag is set.
    pub fn effective_badge(&self) -> Option<StatusBadge> {
        self.status_badge.or(if self.fatigue_flag {
            Some(StatusBadge::Caution)
        } else {
            None
        })
    }
}
