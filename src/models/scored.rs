//! Derived per-player category scores.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Direction of a change between measurement periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Up,
    Down,
    #[default]
    Flat,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tone::Up => write!(f, "up"),
            Tone::Down => write!(f, "down"),
            Tone::Flat => write!(f, "flat"),
        }
    }
}

/// A category score for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCategory {
    pub id: String,
    pub label: String,

    /// Normalized display score; `None` when the player has no data for
    /// the category's source metric
    pub score: Option<i32>,

    /// Change since the previous period, when one exists
    pub delta: Option<i32>,

    pub tone: Tone,

    /// Rank among players, supplied by the report producer
    pub rank: Option<u32>,
}

impl ScoredCategory {
    /// Score to plot: missing scores sit at the chart center.
    pub fn plotted_score(&self) -> i32 {
        self.score.unwrap_or(0)
    }
}

/// Chart-oriented view of a scored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarMetric {
    pub id: String,
    pub label: String,
    pub score: Option<i32>,
    /// Short delta label (`▲ +4`, `▼ 3`, `± 0`)
    pub meta_label: String,
    pub tone: Tone,
}

/// List-oriented view of a scored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryMetric {
    pub id: String,
    pub label: String,
    pub score: Option<i32>,
    pub delta: i32,
}

/// Everything the coach view needs for one player.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScores {
    pub player_id: PlayerId,
    pub categories: Vec<ScoredCategory>,
    pub radar_metrics: Vec<RadarMetric>,
    pub summary_metrics: Vec<SummaryMetric>,
}
