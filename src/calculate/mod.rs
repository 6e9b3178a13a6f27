//! Scoring and layout engine.
//!
//! Pure, synchronous computation over already-decoded report data:
//! - Score normalization and delta tone
//! - Category aggregation against the taxonomy
//! - Radar polygon layout
//!
//! Nothing here performs I/O or keeps state between calls.

pub mod aggregate;
pub mod layout;
pub mod normalize;

pub use aggregate::{build_categories, document_scores, CategoryAggregator};
pub use layout::{layout, ChartPreset, PolygonLayoutEngine, DEFAULT_LABEL_OFFSET, RING_RATIOS};
pub use normalize::{classify_tone, format_delta, normalize, Rounding, ScoreNormalizer};
