//! Report module - summaries, tables, charts and JSON export

pub mod charts;
pub mod cleaning_report;
pub mod summary;
pub mod tables;

pub use charts::*;
pub use cleaning_report::*;
pub use summary::*;
pub use tables::*;
