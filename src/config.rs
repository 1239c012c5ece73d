//! Analysis configuration.
//!
//! Everything the pipeline needs besides the task list itself: the two
//! conversion constants, the compliance tolerance, the nesting window and
//! the candidate range for the group count. The value is built once, then
//! passed by reference into every stage; nothing reads it from a global.
//!
//! Example `efh.toml`:
//!
//! ```toml
//! [conversion]
//! fc_to_fh = 4.83
//! mo_to_fh = 435.0
//!
//! [grouping]
//! k_min = 2
//! k_max = 8
//! algorithm = "kmeans"
//!
//! [compliance]
//! tolerance = 0.20
//!
//! [nesting]
//! eps = 0.10
//!
//! [columns]
//! TASK = "Task Number"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::AnalysisError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Average flight hours per flight cycle.
pub const DEFAULT_FC_TO_FH: f64 = 4.83;
/// Average flight hours per calendar month.
pub const DEFAULT_MO_TO_FH: f64 = 435.0;
/// Relative band a task may deviate from its group center.
pub const DEFAULT_TOLERANCE: f64 = 0.20;
/// Half-width (as a fraction of 2.0) of the nesting ratio window.
pub const DEFAULT_NESTED_EPS: f64 = 0.10;
/// Ratio between neighbouring centers that counts as nesting.
pub const NESTED_TARGET_RATIO: f64 = 2.0;

pub const DEFAULT_K_MIN: usize = 2;
pub const DEFAULT_K_MAX: usize = 8;

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub fc_to_fh: f64,
    pub mo_to_fh: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            fc_to_fh: DEFAULT_FC_TO_FH,
            mo_to_fh: DEFAULT_MO_TO_FH,
        }
    }
}

/// Which 1-D partitioning algorithm backs the group discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionAlgorithm {
    /// Lloyd iterations with deterministic multi-start seeding.
    #[default]
    Kmeans,
    /// Exact dynamic-programming partition of the sorted values.
    Optimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub k_min: usize,
    pub k_max: usize,
    pub algorithm: PartitionAlgorithm,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            k_min: DEFAULT_K_MIN,
            k_max: DEFAULT_K_MAX,
            algorithm: PartitionAlgorithm::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    pub tolerance: f64,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestingConfig {
    pub eps: f64,
}

impl Default for NestingConfig {
    fn default() -> Self {
        Self {
            eps: DEFAULT_NESTED_EPS,
        }
    }
}

/// Complete, immutable configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub conversion: ConversionConfig,
    pub grouping: GroupingConfig,
    pub compliance: ComplianceConfig,
    pub nesting: NestingConfig,
    /// Canonical column name (TASK, TITLE, FH, ...) → header in the file.
    pub columns: BTreeMap<String, String>,
}

impl AnalysisConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig =
            toml::from_str(text).map_err(|e| AnalysisError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges. The limits match what the planning UI allowed.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let c = &self.conversion;
        if !(c.fc_to_fh >= 0.1) {
            return Err(AnalysisError::InvalidConfig(format!(
                "conversion.fc_to_fh must be >= 0.1, got {}",
                c.fc_to_fh
            )));
        }
        if !(c.mo_to_fh >= 10.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "conversion.mo_to_fh must be >= 10.0, got {}",
                c.mo_to_fh
            )));
        }

        let tol = self.compliance.tolerance;
        if !(tol > 0.0 && tol < 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "compliance.tolerance must be in (0, 1), got {}",
                tol
            )));
        }

        let eps = self.nesting.eps;
        if !(0.05..=0.20).contains(&eps) {
            return Err(AnalysisError::InvalidConfig(format!(
                "nesting.eps must be within [0.05, 0.20], got {}",
                eps
            )));
        }

        let g = &self.grouping;
        if g.k_min == 0 || g.k_min > g.k_max {
            return Err(AnalysisError::InvalidConfig(format!(
                "grouping requires 1 <= k_min <= k_max, got k_min={} k_max={}",
                g.k_min, g.k_max
            )));
        }

        Ok(())
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, AnalysisError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AnalysisError::Io(format!("{}: {}", path.display(), e)))?;
    AnalysisConfig::from_toml_str(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
