//! Coach roster list: sorting, filtering and selection.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::calculate::classify_tone;
use crate::models::{Player, Tone};

/// Column the roster is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Grade,
    Position,
    #[default]
    Number,
    GrowthRate,
    FatigueFlag,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortKey {
    /// Direction each key sorts in: growth and fatigue put the largest
    /// values first, everything else ascends.
    pub fn direction(self) -> SortDirection {
        match self {
            SortKey::GrowthRate | SortKey::FatigueFlag => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Ok(SortKey::Name),
            "grade" => Ok(SortKey::Grade),
            "position" => Ok(SortKey::Position),
            "number" => Ok(SortKey::Number),
            "growthrate" | "growth" => Ok(SortKey::GrowthRate),
            "fatigueflag" | "fatigue" => Ok(SortKey::FatigueFlag),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

/// Grade / term filter. `None` matches every player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub grade: Option<String>,
    pub term: Option<String>,
}

impl RosterFilter {
    pub fn matches(&self, player: &Player) -> bool {
        let grade_ok = self
            .grade
            .as_deref()
            .map_or(true, |g| player.grade.as_deref() == Some(g));
        let term_ok = self
            .term
            .as_deref()
            .map_or(true, |t| player.term.as_deref() == Some(t));
        grade_ok && term_ok
    }
}

/// Numeric value of a grade label: its first run of digits, 0 if none.
pub fn grade_value(grade: &str) -> u32 {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS.get_or_init(|| Regex::new(r"\d+").unwrap());
    re.find(grade)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Position order on the pitch: GK, DF, MF, FW, then anything else.
pub fn position_rank(position: &str) -> u32 {
    match position {
        "GK" => 0,
        "DF" => 1,
        "MF" => 2,
        "FW" => 3,
        _ => 9,
    }
}

fn squad_number(player: &Player) -> u32 {
    player.number.unwrap_or(u32::MAX)
}

/// Case-insensitive name order with a byte-order tie-break.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compare two players on a single key, ascending.
pub fn compare_players(a: &Player, b: &Player, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Grade => grade_value(a.grade.as_deref().unwrap_or(""))
            .cmp(&grade_value(b.grade.as_deref().unwrap_or(""))),
        SortKey::Position => position_rank(a.position.as_deref().unwrap_or(""))
            .cmp(&position_rank(b.position.as_deref().unwrap_or(""))),
        SortKey::Number => squad_number(a).cmp(&squad_number(b)),
        SortKey::GrowthRate => a.growth_rate.unwrap_or(0).cmp(&b.growth_rate.unwrap_or(0)),
        SortKey::FatigueFlag => a.fatigue_flag.cmp(&b.fatigue_flag),
    }
}

/// Filter and sort a roster.
///
/// Ties on the sort key fall back to ascending squad number regardless of
/// the key's direction.
pub fn sort_players<'a>(players: &'a [Player], key: SortKey, filter: &RosterFilter) -> Vec<&'a Player> {
    let mut visible: Vec<&Player> = players.iter().filter(|p| filter.matches(p)).collect();
    visible.sort_by(|a, b| {
        let primary = match key.direction() {
            SortDirection::Asc => compare_players(a, b, key),
            SortDirection::Desc => compare_players(b, a, key),
        };
        primary.then_with(|| squad_number(a).cmp(&squad_number(b)))
    });
    visible
}

/// Pick the player to show: the current selection if still visible, else
/// the first visible player, else `fallback`.
pub fn resolve_active<'a>(visible: &[&'a Player], selected: &'a str, fallback: &'a str) -> &'a str {
    visible
        .iter()
        .copied()
        .find(|p| p.id == *selected)
        .or_else(|| visible.first().copied())
        .map(|p| p.id.as_str())
        .unwrap_or(fallback)
}

/// Format a growth rate: `+n%`, `▼n%` or `0%`.
pub fn format_growth_rate(rate: i32) -> String {
    match classify_tone(rate) {
        Tone::Up => format!("+{}%", rate),
        Tone::Down => format!("▼{}%", rate.unsigned_abs()),
        Tone::Flat => "0%".to_string(),
    }
}
