//! Source data retrieval (HTTP or local files).

pub mod jhu;

pub use jhu::{JhuClient, SourceTables, default_confirmed_url, default_deaths_url};
