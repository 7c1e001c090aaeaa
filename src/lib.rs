//! `covid-report` library crate.
//!
//! The binary (`covid-report`) is a thin wrapper around this library so that:
//!
//! - the series preparation is testable without spawning processes
//! - the stages (ingest, prepare, analyze, render) can be reused on their own

pub mod analysis;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod series;
