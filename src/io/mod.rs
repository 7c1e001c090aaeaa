//! Input/output helpers.
//!
//! - wide CSV ingest (`ingest`)
//! - series CSV and summary JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
