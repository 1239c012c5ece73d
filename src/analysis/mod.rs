//! Group discovery over EFH intervals.
//!
//! Submodules:
//! - `partition` — 1-D partitioners behind the `Partitioner` capability.
//! - `elbow`     — chooses the group count from an inertia sequence.
//! - `groups`    — runs the candidates and relabels groups by center.
//! - `summary`   — per-group statistics over compliant tasks.

pub mod elbow;
pub mod groups;
pub mod partition;
pub mod summary;
