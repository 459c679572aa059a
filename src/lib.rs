//! nullsweep: Missing Value Cleaning Library
//!
//! A library for profiling missing values in tabular datasets and cleaning
//! them with threshold-based column and row pruning followed by per-column
//! imputation.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
