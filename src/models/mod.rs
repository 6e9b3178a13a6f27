//! Core data models for athlete reports.

mod geometry;
mod ids;
mod player;
mod range;
mod report;
mod scored;
mod taxonomy;

pub use geometry::*;
pub use ids::*;
pub use player::*;
pub use range::*;
pub use report::*;
pub use scored::*;
pub use taxonomy::*;
