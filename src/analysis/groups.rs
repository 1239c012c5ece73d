//! Group discovery: choose k, partition, and relabel groups by center.

use serde::Serialize;

use super::elbow::choose_elbow;
use super::partition::{Partition, Partitioner};
use crate::config::GroupingConfig;
use crate::logging::{self, Stage};
use crate::model::AnalysisError;

/// Inertia of one evaluated candidate group count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InertiaPoint {
    pub k: usize,
    pub inertia: f64,
}

/// Groups found in a batch of governing intervals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDiscovery {
    pub k: usize,
    /// Ascending; `centers[g - 1]` is the center of group `g`.
    pub centers: Vec<f64>,
    /// 1-based group id per input interval, in input order.
    pub assignments: Vec<usize>,
    /// Every candidate that was fitted, in ascending k.
    pub inertia_trace: Vec<InertiaPoint>,
    /// True when too few distinct intervals existed to evaluate any candidate
    /// and the group count was forced.
    pub forced: bool,
}

impl GroupDiscovery {
    /// Center of a 1-based group id.
    pub fn center_of(&self, group_id: usize) -> Option<f64> {
        group_id
            .checked_sub(1)
            .and_then(|i| self.centers.get(i))
            .copied()
    }
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

/// Finds the natural groups of `intervals`.
///
/// Candidates run from `k_min` to `k_max`, capped at the number of distinct
/// intervals. When no candidate fits in that range, the count is forced to
/// `min(k_min, distinct)`, so a single interval forms a single group.
pub fn discover_groups(
    intervals: &[f64],
    grouping: &GroupingConfig,
    partitioner: &dyn Partitioner,
) -> Result<GroupDiscovery, AnalysisError> {
    if intervals.is_empty() {
        return Err(AnalysisError::NoValidIntervals { tasks_seen: 0 });
    }

    let distinct = distinct_count(intervals);
    let k_hi = grouping.k_max.min(intervals.len()).min(distinct);

    let (partition, inertia_trace, forced) = if k_hi < grouping.k_min {
        let k = grouping.k_min.min(distinct).max(1);
        logging::warn(
            Stage::Grouping,
            None,
            &format!(
                "Only {} distinct interval(s); forcing k={} without elbow selection",
                distinct, k
            ),
        );
        let partition = partitioner.fit(intervals, k);
        let trace = vec![InertiaPoint {
            k: partition.k(),
            inertia: partition.inertia,
        }];
        (partition, trace, true)
    } else {
        let mut fits: Vec<Partition> = (grouping.k_min..=k_hi)
            .map(|k| partitioner.fit(intervals, k))
            .collect();
        let trace: Vec<InertiaPoint> = fits
            .iter()
            .map(|p| InertiaPoint {
                k: p.k(),
                inertia: p.inertia,
            })
            .collect();
        let inertias: Vec<f64> = trace.iter().map(|p| p.inertia).collect();
        let chosen = choose_elbow(&inertias).unwrap_or(fits.len() - 1);
        (fits.swap_remove(chosen), trace, false)
    };

    let discovery = relabel_by_center(partition, inertia_trace, forced);
    logging::info(
        Stage::Grouping,
        None,
        &format!(
            "{} chose k={} over {} interval(s)",
            partitioner.name(),
            discovery.k,
            intervals.len()
        ),
    );
    Ok(discovery)
}

/// Sorts centers ascending and rewrites labels as 1-based ranks.
fn relabel_by_center(partition: Partition, inertia_trace: Vec<InertiaPoint>, forced: bool) -> GroupDiscovery {
    let mut order: Vec<usize> = (0..partition.centers.len()).collect();
    order.sort_by(|&a, &b| partition.centers[a].total_cmp(&partition.centers[b]));

    let mut rank = vec![0usize; order.len()];
    for (position, &raw) in order.iter().enumerate() {
        rank[raw] = position + 1;
    }

    GroupDiscovery {
        k: order.len(),
        centers: order.iter().map(|&raw| partition.centers[raw]).collect(),
        assignments: partition.labels.iter().map(|&raw| rank[raw]).collect(),
        inertia_trace,
        forced,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
