//! # Athlete Report
//!
//! Physical-performance reports for a youth football squad: vendor
//! measurements normalized into category scores and laid out as a radar
//! chart.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, report documents, taxonomy, geometry)
//! - **calculate**: Score normalization, category aggregation and radar layout
//! - **roster**: Coach roster sorting, filtering and selection
//! - **detail**: Drill-down metric formatting and the metric catalog
//! - **ingest**: Vendor CSV exports to report documents
//! - **storage**: Report document files on disk
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod detail;
pub mod ingest;
pub mod models;
pub mod roster;
pub mod storage;

pub use models::*;
