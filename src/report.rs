//! Analysis report
//!
//! Serializable view of one run: the preview table, the In-Group and
//! Out-of-Phase task tables, the nested summary, the group summary and the
//! assumptions/metrics block. Written as JSON by the CLI.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::groups::InertiaPoint;
use crate::analysis::summary::GroupSummary;
use crate::check::nested::NestedSummary;
use crate::model::{AnalysisError, NormalizedTask, TaskAssessment};

// ============================================================================
// Report Types
// ============================================================================

/// Assumptions the run was made under, plus its headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetrics {
    pub chosen_k: usize,
    pub k_forced: bool,
    pub partitioner: String,
    pub fc_to_fh: f64,
    pub mo_to_fh: f64,
    pub tolerance: f64,
    pub nested_target_ratio: f64,
    pub nested_eps: f64,
    pub effective_groups: usize,
    pub total_groups: usize,
    pub effective_reduction: f64,
    pub tasks_total: usize,
    pub tasks_grouped: usize,
    pub tasks_excluded: usize,
    pub tasks_in_group: usize,
    pub tasks_out_of_phase: usize,
}

impl RunMetrics {
    /// Metric/value rows in a fixed order, for tabular output.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Chosen_k (elbow)", self.chosen_k.to_string()),
            ("FC_TO_FH", self.fc_to_fh.to_string()),
            ("MO_TO_FH", self.mo_to_fh.to_string()),
            ("Tolerance_±", self.tolerance.to_string()),
            ("Nested_Target_Ratio", self.nested_target_ratio.to_string()),
            ("Nested_EPS_±", self.nested_eps.to_string()),
            ("Effective_Groups", self.effective_groups.to_string()),
            ("Total_Groups", self.total_groups.to_string()),
            ("Effective_Reduction", format!("{:.1}%", self.effective_reduction * 100.0)),
        ]
    }
}

/// Everything one run derives from a task list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRun {
    /// Every input row with its EFH values, including excluded rows.
    pub preview: Vec<NormalizedTask>,
    pub in_group: Vec<TaskAssessment>,
    pub out_of_phase: Vec<TaskAssessment>,
    pub group_centers: Vec<f64>,
    pub inertia_trace: Vec<InertiaPoint>,
    pub nested: NestedSummary,
    pub group_summary: Vec<GroupSummary>,
    pub metrics: RunMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    #[serde(flatten)]
    pub run: AnalysisRun,
}

// ============================================================================
// Building and Writing
// ============================================================================

/// Stamps a run with its generation time. `now` is injected so reports are
/// reproducible in tests.
pub fn build_report(run: AnalysisRun, now: DateTime<Utc>) -> AnalysisReport {
    AnalysisReport {
        generated_at: now.to_rfc3339(),
        run,
    }
}

pub fn to_json(report: &AnalysisReport) -> Result<String, AnalysisError> {
    serde_json::to_string_pretty(report).map_err(|e| AnalysisError::Io(format!("JSON encoding failed: {}", e)))
}

pub fn write_json(report: &AnalysisReport, path: &Path) -> Result<(), AnalysisError> {
    let json = to_json(report)?;
    std::fs::write(path, json).map_err(|e| AnalysisError::Io(format!("{}: {}", path.display(), e)))
}

/// Multi-line console summary of a run.
pub fn render_summary(run: &AnalysisRun) -> String {
    let m = &run.metrics;
    let mut out = String::new();
    out.push_str(&format!(
        "Tasks: {} total, {} grouped, {} excluded (no valid interval)\n",
        m.tasks_total, m.tasks_grouped, m.tasks_excluded
    ));
    out.push_str(&format!(
        "Groups: k={}{} via {}\n",
        m.chosen_k,
        if m.k_forced { " (forced)" } else { "" },
        m.partitioner
    ));
    for g in &run.nested.groups {
        let nesting = match &g.nested_in {
            Some(target) => format!("  nested in {}", target),
            None => String::new(),
        };
        out.push_str(&format!(
            "  {:<9} center {:>10.1} EFH{}\n",
            g.group_label, g.center_efh, nesting
        ));
    }
    out.push_str(&format!(
        "Compliance (±{:.0}%): {} in-group, {} out-of-phase\n",
        m.tolerance * 100.0,
        m.tasks_in_group,
        m.tasks_out_of_phase
    ));
    out.push_str(&format!(
        "Effective groups: {} / {}  →  reduction {:.1}%\n",
        m.effective_groups,
        m.total_groups,
        m.effective_reduction * 100.0
    ));
    out.push_str("Assumptions:\n");
    for (metric, value) in m.rows() {
        out.push_str(&format!("  {:<20} {}\n", metric, value));
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
