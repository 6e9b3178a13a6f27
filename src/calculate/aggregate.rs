//! Category aggregation: raw player metrics joined to the taxonomy.
//!
//! Missing data policy:
//! - a category whose source metric no player in the document reports is
//!   dropped from the taxonomy up front ([`CategoryAggregator::for_players`]);
//! - a category the document does report, but a given player lacks (or
//!   reports as null), is kept with `score: None`, no delta and a flat tone.
//!
//! Every player therefore gets the same category list, in taxonomy order,
//! and category totals are comparable across players.

use crate::models::{
    CategoryDefinition, Player, PlayerScores, RadarMetric, ReportCategory, ReportDocument,
    ScoredCategory, SummaryMetric, Taxonomy, Tone,
};

use super::normalize::{classify_tone, format_delta, ScoreNormalizer};

/// Scores players against a fixed taxonomy.
#[derive(Debug, Clone)]
pub struct CategoryAggregator {
    taxonomy: Taxonomy,
    normalizer: ScoreNormalizer,
}

impl CategoryAggregator {
    /// Aggregator over the full taxonomy.
    pub fn new(taxonomy: Taxonomy, normalizer: ScoreNormalizer) -> Self {
        Self {
            taxonomy,
            normalizer,
        }
    }

    /// Aggregator over the taxonomy restricted to categories at least one
    /// of `players` has data for.
    pub fn for_players(players: &[Player], taxonomy: &Taxonomy, normalizer: ScoreNormalizer) -> Self {
        Self::new(taxonomy.restrict_to(players), normalizer)
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Score one player, one entry per taxonomy category in declared order.
    pub fn build_categories(&self, player: &Player) -> Vec<ScoredCategory> {
        self.taxonomy
            .definitions()
            .iter()
            .map(|def| self.score_category(player, def))
            .collect()
    }

    /// Score one player and derive the radar and summary views.
    pub fn build_scores(&self, player: &Player) -> PlayerScores {
        let categories = self.build_categories(player);
        PlayerScores {
            player_id: player.id.clone(),
            radar_metrics: categories.iter().map(RadarMetric::from).collect(),
            summary_metrics: categories.iter().map(SummaryMetric::from).collect(),
            categories,
        }
    }

    fn score_category(&self, player: &Player, def: &CategoryDefinition) -> ScoredCategory {
        let metric = player.raw_metric(&def.source);

        let score = metric
            .and_then(|m| m.value)
            .map(|value| self.normalizer.normalize(value + f64::from(def.offset)));
        let delta = metric.and_then(|m| m.delta);
        let tone = delta.map(classify_tone).unwrap_or(Tone::Flat);

        let rank = player
            .categories
            .iter()
            .find(|c| c.id == def.id)
            .and_then(|c| c.rank);

        ScoredCategory {
            id: def.id.clone(),
            label: def.label.clone(),
            score,
            delta,
            tone,
            rank,
        }
    }
}

/// Score a single player against a taxonomy.
pub fn build_categories(
    player: &Player,
    taxonomy: &Taxonomy,
    normalizer: ScoreNormalizer,
) -> Vec<ScoredCategory> {
    CategoryAggregator::new(taxonomy.clone(), normalizer).build_categories(player)
}

/// Scores for a requested player in a document.
///
/// Unknown ids fall back to the document's first player; the returned flag
/// is true when that substitution happened. `None` for a document without
/// players.
pub fn document_scores(
    document: &ReportDocument,
    requested: Option<&str>,
    taxonomy: &Taxonomy,
    normalizer: ScoreNormalizer,
) -> Option<(PlayerScores, bool)> {
    let selection = document.resolve_player(requested)?;
    let aggregator = CategoryAggregator::for_players(&document.players, taxonomy, normalizer);
    Some((aggregator.build_scores(selection.player), selection.substituted))
}

impl From<&ScoredCategory> for RadarMetric {
    fn from(category: &ScoredCategory) -> Self {
        Self {
            id: category.id.clone(),
            label: category.label.clone(),
            score: category.score,
            meta_label: format_delta(category.delta.unwrap_or(0)),
            tone: category.tone,
        }
    }
}

impl From<&ScoredCategory> for SummaryMetric {
    fn from(category: &ScoredCategory) -> Self {
        Self {
            id: category.id.clone(),
            label: category.label.clone(),
            score: category.score,
            delta: category.delta.unwrap_or(0),
        }
    }
}

/// Producer-scored categories carry no delta; their score is rounded as-is.
impl From<&ReportCategory> for ScoredCategory {
    fn from(category: &ReportCategory) -> Self {
        Self {
            id: category.id.clone(),
            label: category.label.clone(),
            score: category
                .score
                .filter(|s| s.is_finite())
                .map(|s| s.round() as i32),
            delta: None,
            tone: Tone::Flat,
            rank: category.rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawMetric;

    fn seeded_player() -> Player {
        Player::new("player-05", "Kaito Sato")
            .with_metric("seed", "accel_speed", RawMetric::value(83.0).with_delta(4))
            .with_metric("seed", "change_dir", RawMetric::value(95.0).with_delta(22))
            .with_metric("seed", "decel", RawMetric::value(72.0).with_delta(6))
            .with_metric("seed", "jump", RawMetric::value(65.0).with_delta(-3))
            .with_metric("seed", "strength", RawMetric::value(70.0).with_delta(0))
            .with_metric("seed", "balance_lr", RawMetric::value(58.0).with_delta(3))
    }

    #[test]
    fn test_build_categories_declared_order() {
        let categories =
            build_categories(&seeded_player(), &Taxonomy::coach_default(), ScoreNormalizer::coach());
        let ids: Vec<_> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["speed", "accel", "decel", "re_accel", "jump", "power", "stability", "balance_lr"]
        );
    }

    #[test]
    fn test_offset_applied_before_normalization() {
        let categories =
            build_categories(&seeded_player(), &Taxonomy::coach_default(), ScoreNormalizer::coach());
        // accel: 83 - 1 = 82 -> 86.875 -> 87
        assert_eq!(categories[1].score, Some(87));
        // speed: 83 + 2 = 85 -> 88.75 -> 89
        assert_eq!(categories[0].score, Some(89));
        // re_accel: 95 + 1 clamps to the top of the display range
        assert_eq!(categories[3].score, Some(95));
    }

    #[test]
    fn test_tone_and_delta() {
        let categories =
            build_categories(&seeded_player(), &Taxonomy::coach_default(), ScoreNormalizer::coach());
        assert_eq!(categories[3].delta, Some(22));
        assert_eq!(categories[3].tone, Tone::Up);
        assert_eq!(categories[4].tone, Tone::Down);
        assert_eq!(categories[5].tone, Tone::Flat);
    }

    #[test]
    fn test_partially_populated_player_gets_null_scores() {
        let player = Player::new("p", "Partial")
            .with_metric("seed", "jump", RawMetric::value(75.0).with_delta(1))
            .with_metric("seed", "decel", RawMetric::default());
        let categories =
            build_categories(&player, &Taxonomy::coach_default(), ScoreNormalizer::coach());

        assert_eq!(categories.len(), 8);
        let jump = categories.iter().find(|c| c.id == "jump").unwrap();
        assert_eq!(jump.score, Some(83));

        // Declared but null value
        let decel = categories.iter().find(|c| c.id == "decel").unwrap();
        assert_eq!(decel.score, None);

        // Not reported at all
        let power = categories.iter().find(|c| c.id == "power").unwrap();
        assert_eq!(power.score, None);
        assert_eq!(power.delta, None);
        assert_eq!(power.tone, Tone::Flat);
    }

    #[test]
    fn test_fully_absent_category_omitted() {
        let players = vec![
            Player::new("a", "A").with_metric("seed", "jump", RawMetric::value(60.0)),
            Player::new("b", "B").with_metric("seed", "strength", RawMetric::value(80.0)),
        ];
        let aggregator =
            CategoryAggregator::for_players(&players, &Taxonomy::coach_default(), ScoreNormalizer::coach());

        let ids: Vec<_> = aggregator
            .build_categories(&players[0])
            .into_iter()
            .map(|c| (c.id, c.score))
            .collect();
        assert_eq!(
            ids,
            vec![("jump".to_string(), Some(73)), ("power".to_string(), None)]
        );
    }

    #[test]
    fn test_radar_and_summary_agree() {
        let aggregator = CategoryAggregator::new(Taxonomy::coach_default(), ScoreNormalizer::coach());
        let scores = aggregator.build_scores(&seeded_player());

        assert_eq!(scores.radar_metrics.len(), scores.summary_metrics.len());
        for (radar, summary) in scores.radar_metrics.iter().zip(&scores.summary_metrics) {
            assert_eq!(radar.id, summary.id);
            assert_eq!(radar.score, summary.score);
        }
        assert_eq!(scores.radar_metrics[3].meta_label, "▲ +22");
        assert_eq!(scores.summary_metrics[3].delta, 22);
        assert_eq!(scores.radar_metrics[4].meta_label, "▼ 3");
    }

    #[test]
    fn test_missing_delta_views() {
        let player = Player::new("p", "P").with_metric("seed", "jump", RawMetric::value(70.0));
        let aggregator = CategoryAggregator::for_players(
            std::slice::from_ref(&player),
            &Taxonomy::coach_default(),
            ScoreNormalizer::coach(),
        );
        let scores = aggregator.build_scores(&player);
        assert_eq!(scores.radar_metrics[0].meta_label, "± 0");
        assert_eq!(scores.summary_metrics[0].delta, 0);
    }

    #[test]
    fn test_rank_comes_from_report_categories() {
        let mut player = seeded_player();
        player.categories.push(ReportCategory {
            id: "jump".to_string(),
            label: "Jump".to_string(),
            score: Some(80.0),
            rank: Some(4),
            vendor: None,
        });
        let categories =
            build_categories(&player, &Taxonomy::coach_default(), ScoreNormalizer::coach());
        assert_eq!(categories.iter().find(|c| c.id == "jump").unwrap().rank, Some(4));
        assert_eq!(categories.iter().find(|c| c.id == "power").unwrap().rank, None);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let aggregator = CategoryAggregator::new(Taxonomy::coach_default(), ScoreNormalizer::coach());
        let player = seeded_player();
        assert_eq!(aggregator.build_categories(&player), aggregator.build_categories(&player));
    }

    #[test]
    fn test_document_scores_fallback() {
        let document = ReportDocument {
            players: vec![seeded_player()],
            ..Default::default()
        };
        let (scores, substituted) = document_scores(
            &document,
            Some("nobody"),
            &Taxonomy::coach_default(),
            ScoreNormalizer::coach(),
        )
        .unwrap();
        assert!(substituted);
        assert_eq!(scores.player_id.as_str(), "player-05");
    }

    #[test]
    fn test_document_scores_empty_document() {
        let result = document_scores(
            &ReportDocument::default(),
            Some("player-05"),
            &Taxonomy::coach_default(),
            ScoreNormalizer::coach(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_report_category_conversion() {
        let category = ReportCategory {
            id: "sprint".to_string(),
            label: "Sprint".to_string(),
            score: Some(86.6),
            rank: Some(2),
            vendor: Some("PHOTON".to_string()),
        };
        let scored = ScoredCategory::from(&category);
        assert_eq!(scored.score, Some(87));
        assert_eq!(scored.rank, Some(2));
        assert_eq!(scored.tone, Tone::Flat);
    }
}
