//! Radar chart geometry.

use serde::Serialize;

/// A 2-D point in canvas coordinates (+y points down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry for a single axis / category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisGeometry {
    pub category_id: String,
    /// Axis angle in radians, `-π/2` for the first axis
    pub angle: f64,
    /// Axis end at full radius
    pub endpoint: Point,
    /// This axis' vertex on each reference ring, innermost first
    pub ring_points: [Point; 4],
    /// Data polygon vertex
    pub vertex: Point,
    /// Label position as a fraction (0..1) of the canvas size
    pub label_anchor: Point,
}

/// A reference ring: one closed polyline at a fixed fraction of the radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring {
    pub ratio: f64,
    pub points: Vec<Point>,
}

/// Complete geometry for one radar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonGeometry {
    pub canvas_size: f64,
    pub center: Point,
    pub max_radius: f64,
    pub axes: Vec<AxisGeometry>,
    pub rings: Vec<Ring>,
    /// Data polygon vertices in axis order; closing back to the first
    /// vertex is implied
    pub outline: Vec<Point>,
}

impl PolygonGeometry {
    /// Geometry with no axes, rings or outline.
    pub fn empty(canvas_size: f64, max_radius: f64) -> Self {
        let c = canvas_size / 2.0;
        Self {
            canvas_size,
            center: Point::new(c, c),
            max_radius,
            axes: Vec::new(),
            rings: Vec::new(),
            outline: Vec::new(),
        }
    }

    /// Returns true when there is nothing to draw; callers show a
    /// "no data" placeholder instead.
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Outline with the first vertex repeated at the end.
    pub fn closed_outline(&self) -> Vec<Point> {
        let mut points = self.outline.clone();
        if let Some(first) = self.outline.first() {
            points.push(*first);
        }
        points
    }

    /// Closed data outline as an SVG `points` attribute.
    pub fn outline_svg_points(&self) -> String {
        svg_points(&self.closed_outline())
    }
}

/// Format points as an SVG `points` attribute (`"x,y x,y ..."`).
pub fn svg_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
