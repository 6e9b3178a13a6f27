//! Radar chart layout.
//!
//! Axes are spaced evenly by `2π / N`, starting straight up (`-π/2`) and
//! proceeding clockwise in screen coordinates (+y down). Scores are read on
//! a 0–100 scale and are not clamped here; normalization already bounds
//! them.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::models::{AxisGeometry, Point, PolygonGeometry, Ring, ScoredCategory};

/// Reference ring radii as fractions of the maximum radius.
pub const RING_RATIOS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// Label distance beyond the maximum radius used by [`layout`].
pub const DEFAULT_LABEL_OFFSET: f64 = 34.0;

/// Full-scale score: a score of 100 reaches the axis endpoint.
const SCORE_SCALE: f64 = 100.0;

/// Canvas presets used by the two chart views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartPreset {
    /// Coach dashboard chart (280 px, inset 46, labels +34)
    #[default]
    Coach,
    /// Player dashboard chart (320 px, inset 32, labels +50)
    Dashboard,
}

impl std::str::FromStr for ChartPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coach" => Ok(ChartPreset::Coach),
            "dashboard" => Ok(ChartPreset::Dashboard),
            other => Err(format!("Unknown chart preset: {}", other)),
        }
    }
}

/// Computes radar geometry for a fixed canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonLayoutEngine {
    pub canvas_size: f64,
    pub radius_inset: f64,
    pub label_offset: f64,
}

impl PolygonLayoutEngine {
    pub fn new(canvas_size: f64, radius_inset: f64, label_offset: f64) -> Self {
        Self {
            canvas_size,
            radius_inset,
            label_offset,
        }
    }

    pub fn preset(preset: ChartPreset) -> Self {
        match preset {
            ChartPreset::Coach => Self::new(280.0, 46.0, 34.0),
            ChartPreset::Dashboard => Self::new(320.0, 32.0, 50.0),
        }
    }

    pub fn center(&self) -> f64 {
        self.canvas_size / 2.0
    }

    /// `canvas_size / 2 - radius_inset`.
    pub fn max_radius(&self) -> f64 {
        self.canvas_size / 2.0 - self.radius_inset
    }

    /// Angle of axis `index` out of `axis_count` (which must be non-zero).
    pub fn axis_angle(index: usize, axis_count: usize) -> f64 {
        let angle_step = TAU / axis_count as f64;
        -FRAC_PI_2 + angle_step * index as f64
    }

    /// Lay out one axis per category, in the given order.
    pub fn layout(&self, categories: &[ScoredCategory]) -> PolygonGeometry {
        let max_radius = self.max_radius();
        let axis_count = categories.len();
        if axis_count == 0 {
            return PolygonGeometry::empty(self.canvas_size, max_radius);
        }

        let c = self.center();
        let label_radius = max_radius + self.label_offset;

        let axes: Vec<AxisGeometry> = categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let angle = Self::axis_angle(i, axis_count);
                let radius = f64::from(category.plotted_score()) / SCORE_SCALE * max_radius;
                let label = polar(c, label_radius, angle);

                AxisGeometry {
                    category_id: category.id.clone(),
                    angle,
                    endpoint: polar(c, max_radius, angle),
                    ring_points: RING_RATIOS.map(|ratio| polar(c, ratio * max_radius, angle)),
                    vertex: polar(c, radius, angle),
                    label_anchor: Point::new(label.x / self.canvas_size, label.y / self.canvas_size),
                }
            })
            .collect();

        let rings = RING_RATIOS
            .iter()
            .enumerate()
            .map(|(r, &ratio)| Ring {
                ratio,
                points: axes.iter().map(|a| a.ring_points[r]).collect(),
            })
            .collect();

        let outline = axes.iter().map(|a| a.vertex).collect();

        PolygonGeometry {
            canvas_size: self.canvas_size,
            center: Point::new(c, c),
            max_radius,
            axes,
            rings,
            outline,
        }
    }
}

impl Default for PolygonLayoutEngine {
    fn default() -> Self {
        Self::preset(ChartPreset::default())
    }
}

/// Lay out categories on a square canvas with the default label offset.
pub fn layout(categories: &[ScoredCategory], canvas_size: f64, radius_inset: f64) -> PolygonGeometry {
    PolygonLayoutEngine::new(canvas_size, radius_inset, DEFAULT_LABEL_OFFSET).layout(categories)
}

fn polar(center: f64, radius: f64, angle: f64) -> Point {
    Point::new(center + radius * angle.cos(), center + radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tone;

    const EPS: f64 = 1e-9;

    fn categories(scores: &[Option<i32>]) -> Vec<ScoredCategory> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| ScoredCategory {
                id: format!("c{}", i),
                label: format!("Category {}", i),
                score,
                delta: None,
                tone: Tone::Flat,
                rank: None,
            })
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let geometry = layout(&[], 280.0, 46.0);
        assert!(geometry.is_empty());
        assert!(geometry.rings.is_empty());
        assert!(geometry.outline.is_empty());
        assert_eq!(geometry.max_radius, 94.0);
    }

    #[test]
    fn test_counts_match_category_count() {
        for n in 1..=9 {
            let geometry = layout(&categories(&vec![Some(80); n]), 280.0, 46.0);
            assert_eq!(geometry.axes.len(), n);
            assert_eq!(geometry.outline.len(), n);
            assert_eq!(geometry.rings.len(), 4);
            for ring in &geometry.rings {
                assert_eq!(ring.points.len(), n);
            }
        }
    }

    #[test]
    fn test_four_axes_point_up_right_down_left() {
        let geometry = layout(&categories(&[Some(100); 4]), 200.0, 20.0);
        let c = geometry.center;
        let [up, right, down, left] = [0, 1, 2, 3].map(|i| geometry.axes[i].endpoint);

        assert!((up.x - c.x).abs() < EPS && up.y < c.y);
        assert!(right.x > c.x && (right.y - c.y).abs() < EPS);
        assert!((down.x - c.x).abs() < EPS && down.y > c.y);
        assert!(left.x < c.x && (left.y - c.y).abs() < EPS);

        assert!((geometry.axes[0].angle + FRAC_PI_2).abs() < EPS);
        assert!(geometry.axes[1].angle.abs() < EPS);
    }

    #[test]
    fn test_single_axis_points_up() {
        let geometry = layout(&categories(&[Some(50)]), 100.0, 10.0);
        let vertex = geometry.axes[0].vertex;
        assert!((vertex.x - 50.0).abs() < EPS);
        assert!((vertex.y - 30.0).abs() < EPS);
    }

    #[test]
    fn test_vertex_radius_follows_score() {
        let geometry = layout(&categories(&[Some(100), Some(50), Some(0)]), 280.0, 46.0);
        let c = geometry.center;
        let dist = |p: Point| ((p.x - c.x).powi(2) + (p.y - c.y).powi(2)).sqrt();

        assert!((dist(geometry.axes[0].vertex) - 94.0).abs() < EPS);
        assert!((dist(geometry.axes[1].vertex) - 47.0).abs() < EPS);
        assert!(dist(geometry.axes[2].vertex) < EPS);
    }

    #[test]
    fn test_missing_score_sits_at_center() {
        let geometry = layout(&categories(&[None, Some(90)]), 280.0, 46.0);
        assert_eq!(geometry.axes[0].vertex, geometry.center);
    }

    #[test]
    fn test_ring_radii() {
        let geometry = layout(&categories(&[Some(70); 3]), 280.0, 40.0);
        let c = geometry.center;
        for ring in &geometry.rings {
            for p in &ring.points {
                let d = ((p.x - c.x).powi(2) + (p.y - c.y).powi(2)).sqrt();
                assert!((d - ring.ratio * 100.0).abs() < EPS);
            }
        }
        assert_eq!(geometry.rings[3].points[1], geometry.axes[1].endpoint);
    }

    #[test]
    fn test_label_anchor_fraction() {
        let engine = PolygonLayoutEngine::preset(ChartPreset::Dashboard);
        let geometry = engine.layout(&categories(&[Some(80); 4]));
        // First label straight up at radius 128 + 50 from center 160
        let anchor = geometry.axes[0].label_anchor;
        assert!((anchor.x - 0.5).abs() < EPS);
        assert!((anchor.y - (160.0 - 178.0) / 320.0).abs() < EPS);
        // Second label to the right, beyond the axis endpoint
        let anchor = geometry.axes[1].label_anchor;
        assert!(anchor.x * 320.0 > geometry.axes[1].endpoint.x);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let input = categories(&[Some(87), Some(72), None, Some(95), Some(70)]);
        let engine = PolygonLayoutEngine::default();
        assert_eq!(engine.layout(&input), engine.layout(&input));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Coach".parse::<ChartPreset>(), Ok(ChartPreset::Coach));
        assert_eq!("dashboard".parse::<ChartPreset>(), Ok(ChartPreset::Dashboard));
        assert!("radar".parse::<ChartPreset>().is_err());
    }

    #[test]
    fn test_axis_ids_follow_input_order() {
        let geometry = layout(&categories(&[Some(1), Some(2), Some(3)]), 280.0, 46.0);
        let ids: Vec<_> = geometry.axes.iter().map(|a| a.category_id.as_str()).collect();
        assert_eq!(ids, vec!["c0", "c1", "c2"]);
    }
}
