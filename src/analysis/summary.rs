//! Per-group statistics over the tasks that actually fold into each group.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{TaskAssessment, group_label};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group_id: usize,
    pub tasks: usize,
    pub mean_efh: f64,
    pub median_efh: f64,
    pub min_efh: f64,
    pub max_efh: f64,
    pub center_efh: f64,
    pub suggested_label: String,
}

/// Label such as `Group-2 (~2000 EFH)`. Halves round to even.
pub fn suggested_label(group_id: usize, center_efh: f64) -> String {
    format!("{} (~{} EFH)", group_label(group_id), center_efh.round_ties_even() as i64)
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Summarizes In-Group tasks only, ordered by group id. Groups without a
/// compliant member are omitted.
pub fn summarize_groups(assessments: &[TaskAssessment]) -> Vec<GroupSummary> {
    let mut by_group: BTreeMap<usize, (f64, Vec<f64>)> = BTreeMap::new();
    for task in assessments.iter().filter(|t| t.is_in_group()) {
        by_group
            .entry(task.group_id)
            .or_insert_with(|| (task.group_center_efh, Vec::new()))
            .1
            .push(task.interval_efh);
    }

    by_group
        .into_iter()
        .map(|(group_id, (center_efh, mut intervals))| {
            intervals.sort_by(f64::total_cmp);
            let tasks = intervals.len();
            GroupSummary {
                group_id,
                tasks,
                mean_efh: intervals.iter().sum::<f64>() / tasks as f64,
                median_efh: median(&intervals),
                min_efh: intervals[0],
                max_efh: intervals[tasks - 1],
                center_efh,
                suggested_label: suggested_label(group_id, center_efh),
            }
        })
        .collect()
}
