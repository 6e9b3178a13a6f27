//! Report document: the decoded snapshot supplied by the report producer.

use serde::{Deserialize, Serialize};

use super::{Player, PlayerId, ScoreRange};

/// Measurement event metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
}

impl EventInfo {
    /// Placeholder shown before a document is available.
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            date: "--".to_string(),
        }
    }
}

/// A category score computed by the report producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCategory {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub vendor: Option<String>,
}

/// A single metric row inside a detail section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMetric {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,
}

/// A vendor-specific group of metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub metrics: Vec<SectionMetric>,
}

/// Entry for a player picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerOption {
    pub id: PlayerId,
    pub name: String,
    pub position: Option<String>,
}

/// Result of resolving a requested player id.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSelection<'a> {
    pub player: &'a Player,
    /// True when the requested id was not found and the default player was
    /// substituted. Callers should tell the user they are looking at the
    /// default player.
    pub substituted: bool,
}

/// The full report snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    #[serde(default)]
    pub event: Option<EventInfo>,

    #[serde(default)]
    pub generated_at: String,

    #[serde(default)]
    pub score_range: ScoreRange,

    #[serde(default)]
    pub players: Vec<Player>,
}

impl Default for ReportDocument {
    fn default() -> Self {
        Self {
            event: None,
            generated_at: String::new(),
            score_range: ScoreRange::default(),
            players: Vec::new(),
        }
    }
}

impl ReportDocument {
    /// Event metadata, or a `--` placeholder. An event without a date
    /// (`"event": {}`) also shows `--`.
    pub fn event_or_placeholder(&self) -> EventInfo {
        match &self.event {
            Some(event) if event.date.is_empty() => EventInfo {
                id: event.id.clone(),
                date: EventInfo::placeholder().date,
            },
            Some(event) => event.clone(),
            None => EventInfo::placeholder(),
        }
    }

    /// Player picker entries in document order.
    pub fn player_options(&self) -> Vec<PlayerOption> {
        self.players
            .iter()
            .map(|p| PlayerOption {
                id: p.id.clone(),
                name: p.name.clone(),
                position: p.position.clone(),
            })
            .collect()
    }

    /// Id of the first player, or an empty string for an empty document.
    pub fn default_player_id(&self) -> &str {
        self.players.first().map(|p| p.id.as_str()).unwrap_or("")
    }

    /// Find a player by exact id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    /// Resolve a requested player id.
    ///
    /// Unknown or missing ids fall back to the first player in the
    /// document with `substituted` set. Returns `None` only when the
    /// document has no players at all.
    pub fn resolve_player(&self, id: Option<&str>) -> Option<PlayerSelection<'_>> {
        if let Some(player) = id.and_then(|id| self.player(id)) {
            return Some(PlayerSelection {
                player,
                substituted: false,
            });
        }
        self.players.first().map(|player| PlayerSelection {
            player,
            substituted: id.is_some_and(|id| !id.is_empty()),
        })
    }

    /// Pre-scored categories of the resolved player.
    pub fn report_categories(&self, id: Option<&str>) -> Vec<ReportCategory> {
        self.resolve_player(id)
            .map(|s| s.player.categories.clone())
            .unwrap_or_default()
    }
}
