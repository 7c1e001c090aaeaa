//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - wide and long table shapes (`WideCumulativeTable`, `LongObservation`)
//! - the joined and differenced outputs (`CombinedObservation`, `RegionDailySeries`)
//! - run configuration (`ReportConfig`, `SourceLocation`)

pub mod types;

pub use types::*;
