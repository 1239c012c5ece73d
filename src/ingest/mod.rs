//! Task list ingestion.
//!
//! - `task_list` — CSV parsing and header resolution into `TaskRecord`s.
//! - `ata`       — ATA chapter extraction from task identifiers.

pub mod ata;
pub mod task_list;
