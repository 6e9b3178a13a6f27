//! Static category taxonomy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Player;

/// Taxonomy construction errors.
#[derive(Debug, Error, PartialEq)]
pub enum TaxonomyError {
    #[error("Duplicate category id: {0}")]
    DuplicateId(String),

    #[error("Category id must not be empty (label: {0})")]
    EmptyId(String),
}

/// One entry of the category taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Category id
    pub id: String,

    /// Display label
    pub label: String,

    /// Metric key the score is read from
    pub source: String,

    /// Offset added to the raw value before normalization
    #[serde(default)]
    pub offset: i32,
}

impl CategoryDefinition {
    pub fn new(id: &str, label: &str, source: &str, offset: i32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            source: source.to_string(),
            offset,
        }
    }
}

/// An ordered, immutable list of category definitions with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    definitions: Vec<CategoryDefinition>,
}

impl Taxonomy {
    /// Build a taxonomy, rejecting empty or duplicate ids.
    pub fn new(definitions: Vec<CategoryDefinition>) -> Result<Self, TaxonomyError> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if def.id.trim().is_empty() {
                return Err(TaxonomyError::EmptyId(def.label.clone()));
            }
            if !seen.insert(def.id.as_str()) {
                return Err(TaxonomyError::DuplicateId(def.id.clone()));
            }
        }
        Ok(Self { definitions })
    }

    /// The coach dashboard taxonomy.
    ///
    /// Several categories read the same seed metric and differ only by
    /// offset (speed/accel from `accel_speed`, stability/left-right balance
    /// from `balance_lr`).
    pub fn coach_default() -> Self {
        Self {
            definitions: vec![
                CategoryDefinition::new("speed", "Speed", "accel_speed", 2),
                CategoryDefinition::new("accel", "Acceleration", "accel_speed", -1),
                CategoryDefinition::new("decel", "Deceleration", "decel", 0),
                CategoryDefinition::new("re_accel", "Re-acceleration", "change_dir", 1),
                CategoryDefinition::new("jump", "Jump", "jump", 0),
                CategoryDefinition::new("power", "Power", "strength", 1),
                CategoryDefinition::new("stability", "Stability", "balance_lr", 2),
                CategoryDefinition::new("balance_lr", "Balance / L-R Difference", "balance_lr", -1),
            ],
        }
    }

    /// Definitions in declared order.
    pub fn definitions(&self) -> &[CategoryDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Get a definition by category id.
    pub fn get(&self, id: &str) -> Option<&CategoryDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Keep only the categories whose source metric at least one of the
    /// given players reports. Declared order is preserved.
    pub fn restrict_to(&self, players: &[Player]) -> Self {
        Self {
            definitions: self
                .definitions
                .iter()
                .filter(|d| players.iter().any(|p| p.has_metric(&d.source)))
                .cloned()
                .collect(),
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::coach_default()
    }
}
