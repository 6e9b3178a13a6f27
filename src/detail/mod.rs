//! Drill-down detail view: formatted metric rows per vendor section.

mod catalog;

pub use catalog::*;

use serde::Serialize;

use crate::models::{ReportDocument, ReportSection, SectionMetric};

/// Placeholder for values that are not available.
pub const MISSING_VALUE: &str = "--";

/// Section rendered as grouped agility phases.
pub const AGILITY_SECTION_ID: &str = "agility_505";

/// Which side dominates a left/right asymmetry metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSide {
    Unknown,
    LeftDominant,
    RightDominant,
    Even,
}

impl std::fmt::Display for BalanceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceSide::Unknown => write!(f, "L/R difference unknown"),
            BalanceSide::LeftDominant => write!(f, "left dominant"),
            BalanceSide::RightDominant => write!(f, "right dominant"),
            BalanceSide::Even => write!(f, "even"),
        }
    }
}

/// Balance indicator for `lr_` metrics; `None` for every other metric.
///
/// The vendor's signed raw value is positive when the left side is
/// stronger.
pub fn balance_side(metric_id: &str, raw: Option<f64>) -> Option<BalanceSide> {
    if !metric_id.starts_with("lr_") {
        return None;
    }
    Some(match raw {
        None => BalanceSide::Unknown,
        Some(r) if r > 0.0 => BalanceSide::LeftDominant,
        Some(r) if r < 0.0 => BalanceSide::RightDominant,
        Some(_) => BalanceSide::Even,
    })
}

/// Display string for a metric value.
///
/// Uses the producer's `display` string when present; otherwise the value
/// with its unit, omitting the placeholder unit `vendor`.
pub fn format_metric_value(metric: &SectionMetric) -> String {
    if let Some(display) = metric.display.as_deref().filter(|d| !d.is_empty()) {
        return display.to_string();
    }
    let Some(value) = metric.value else {
        return MISSING_VALUE.to_string();
    };
    match metric.unit.as_deref() {
        Some(unit) if !unit.is_empty() && unit != "vendor" => format!("{} {}", value, unit),
        _ => format!("{}", value),
    }
}

/// One row of the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailMetric {
    pub id: String,
    pub label: String,
    /// Previous period value; documents carry a single period, so this is
    /// always the placeholder
    pub previous: String,
    pub current: String,
    pub raw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceSide>,
}

impl From<&SectionMetric> for DetailMetric {
    fn from(metric: &SectionMetric) -> Self {
        Self {
            id: metric.id.clone(),
            label: metric.label.clone(),
            previous: MISSING_VALUE.to_string(),
            current: format_metric_value(metric),
            raw: metric.raw,
            balance: balance_side(&metric.id, metric.raw),
        }
    }
}

/// A vendor section of the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSection {
    pub id: String,
    pub title: String,
    pub vendor: Option<String>,
    pub metrics: Vec<DetailMetric>,
}

impl From<&ReportSection> for DetailSection {
    fn from(section: &ReportSection) -> Self {
        Self {
            id: section.id.clone(),
            title: section.title.clone(),
            vendor: section.vendor.clone(),
            metrics: section.metrics.iter().map(DetailMetric::from).collect(),
        }
    }
}

/// Detail sections for the requested player (falling back to the first
/// player). Empty for an empty document.
pub fn detail_sections(document: &ReportDocument, player_id: Option<&str>) -> Vec<DetailSection> {
    document
        .resolve_player(player_id)
        .map(|s| s.player.sections.iter().map(DetailSection::from).collect())
        .unwrap_or_default()
}

/// A labelled subset of a section's metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub metrics: Vec<DetailMetric>,
}

const AGILITY_GROUPS: &[(&str, &str, &[&str])] = &[
    (
        "accel",
        "Acceleration",
        &["agility_avg_accel", "agility_5_0_time", "agility_max_speed"],
    ),
    ("decel", "Deceleration", &["agility_avg_decel"]),
    (
        "re_accel",
        "Re-acceleration",
        &["agility_avg_reaccel", "agility_0_5_time"],
    ),
];

/// Split 5-0-5 agility metrics into acceleration, deceleration and
/// re-acceleration phases. Groups with no matching metric are dropped;
/// metrics outside every group are not shown.
pub fn agility_groups(section: &DetailSection) -> Vec<MetricGroup> {
    AGILITY_GROUPS
        .iter()
        .filter_map(|&(id, label, metric_ids)| {
            let metrics: Vec<DetailMetric> = metric_ids
                .iter()
                .filter_map(|mid| section.metrics.iter().find(|m| m.id == *mid).cloned())
                .collect();
            if metrics.is_empty() {
                None
            } else {
                Some(MetricGroup { id, label, metrics })
            }
        })
        .collect()
}
