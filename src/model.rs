/// TaskRecord, NormalizedTask, ComplianceVerdict, AnalysisError
/// core data structures and error handling
///
/// Core data types for the EFH task grouping service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no algorithms and no I/O, only types and their small helpers.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status labels
// ---------------------------------------------------------------------------

/// Report label for a task that folds into its group within tolerance.
pub const STATUS_IN_GROUP: &str = "In-Group";

/// Report label for a task whose interval falls outside the tolerance band.
pub const STATUS_OUT_OF_PHASE: &str = "Out-of-Phase";

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One row of the maintenance task list, after ingestion.
///
/// Numeric fields have already been through the best-effort parse in
/// `normalize::parse_numeric`; anything that could not be read is `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub title: String,
    /// ATA chapter, e.g. "21-51-01". Extracted by the ingest layer.
    pub ata: Option<String>,
    /// Flight-hour recurrence.
    pub fh: Option<f64>,
    /// Flight-cycle recurrence.
    pub cy: Option<f64>,
    /// Calendar recurrence, expressed in `cal_code` units.
    pub cal: Option<f64>,
    pub cal_code: Option<String>,
    /// Raw INT/THRES column, carried through untouched.
    pub interval_threshold: Option<String>,
}

/// Calendar units accepted in the CODE column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarUnit {
    Day,
    Week,
    Month,
    Year,
}

// ---------------------------------------------------------------------------
// Derived per-task values
// ---------------------------------------------------------------------------

/// A task with every basis converted to EFH.
///
/// `interval_efh` is the governing interval: the smallest strictly positive
/// basis. `None` means the task cannot be grouped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTask {
    #[serde(flatten)]
    pub record: TaskRecord,
    pub efh_fh: Option<f64>,
    pub efh_fc: Option<f64>,
    pub efh_cal: Option<f64>,
    pub interval_efh: Option<f64>,
}

impl NormalizedTask {
    pub fn is_groupable(&self) -> bool {
        self.interval_efh.is_some()
    }
}

/// Compliance status of a task against its group center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "In-Group")]
    InGroup,
    #[serde(rename = "Out-of-Phase")]
    OutOfPhase,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::InGroup => write!(f, "{}", STATUS_IN_GROUP),
            ComplianceStatus::OutOfPhase => write!(f, "{}", STATUS_OUT_OF_PHASE),
        }
    }
}

/// Outcome of comparing a task interval with its group center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplianceVerdict {
    /// `(center - interval) / interval`; `None` when either side is unusable.
    pub deviation_ratio: Option<f64>,
    pub status: ComplianceStatus,
    /// The group would run the task after its own due point.
    pub late_risk: bool,
}

/// A grouped task with its assignment and verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAssessment {
    pub task_id: String,
    pub title: String,
    pub ata: Option<String>,
    pub fh: Option<f64>,
    pub cy: Option<f64>,
    pub cal: Option<f64>,
    pub cal_code: Option<String>,
    pub interval_efh: f64,
    /// 1-based group index, ascending by center.
    pub group_id: usize,
    pub group_center_efh: f64,
    #[serde(flatten)]
    pub verdict: ComplianceVerdict,
}

impl TaskAssessment {
    pub fn is_in_group(&self) -> bool {
        self.verdict.status == ComplianceStatus::InGroup
    }
}

/// Display label used for groups everywhere in reports.
pub fn group_label(group_id: usize) -> String {
    format!("Group-{}", group_id)
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can end an analysis run.
///
/// Per-task problems (missing numbers, undefined centers) never show up
/// here; they degrade to "absent" or "Out-of-Phase" instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Not a single task in the batch has a positive governing interval.
    NoValidIntervals { tasks_seen: usize },
    /// A configuration value is outside its accepted range.
    InvalidConfig(String),
    /// The configuration file could not be parsed.
    ConfigParse(String),
    /// The task list could not be read as a table.
    MalformedInput(String),
    /// Reading or writing a file failed.
    Io(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::NoValidIntervals { tasks_seen } => write!(
                f,
                "Nothing to group: none of {} tasks has a valid EFH interval",
                tasks_seen
            ),
            AnalysisError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            AnalysisError::ConfigParse(msg) => write!(f, "Config parse error: {}", msg),
            AnalysisError::MalformedInput(msg) => write!(f, "Malformed task list: {}", msg),
            AnalysisError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
