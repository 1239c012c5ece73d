//! Checks run over discovered groups.
//!
//! - `compliance` — per-task tolerance check against the group center.
//! - `nested`     — near-2x relationships between neighbouring groups.

pub mod compliance;
pub mod nested;
