//! EFH maintenance task grouping.
//!
//! Converts task recurrence intervals to Equivalent Flight Hours, finds the
//! natural execution groups, checks each task against its group within a
//! tolerance, and detects groups that nest into a ~2x larger neighbour.

pub mod analysis;
pub mod check;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;

pub use config::AnalysisConfig;
pub use model::{AnalysisError, TaskRecord};
pub use pipeline::{run_analysis, run_analysis_with};
pub use report::{AnalysisReport, AnalysisRun};
