//! Nested group detection.
//!
//! When the next larger group center is about twice a group's center, the
//! smaller group's work can ride along with every other occurrence of the
//! larger one. Only immediate neighbours in the sorted center sequence are
//! compared.

use serde::Serialize;

use crate::config::NESTED_TARGET_RATIO;
use crate::model::group_label;

/// Absorbs floating-point error so the window endpoints stay inclusive.
const RATIO_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedGroup {
    pub group_index: usize,
    pub group_label: String,
    pub center_efh: f64,
    pub nested_flag: bool,
    /// Label of the next larger group this one folds into.
    pub nested_in: Option<String>,
    /// Group whose inspection event finally carries this group's work,
    /// following direct nesting flags to the end of the chain.
    pub executed_with: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedSummary {
    pub groups: Vec<NestedGroup>,
    /// Indices of groups not nested into another, ascending.
    pub effective_groups: Vec<usize>,
    pub effective_centers: Vec<f64>,
    pub effective_reduction: f64,
}

impl NestedSummary {
    pub fn total_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn effective_count(&self) -> usize {
        self.effective_groups.len()
    }

    pub fn nested_count(&self) -> usize {
        self.groups.iter().filter(|g| g.nested_flag).count()
    }
}

/// True when `larger / smaller` lies within `2 ± 2·eps`.
pub fn is_nested_pair(smaller: f64, larger: f64, eps: f64) -> bool {
    if !(smaller > 0.0) {
        return false;
    }
    let ratio = larger / smaller;
    (ratio - NESTED_TARGET_RATIO).abs() <= NESTED_TARGET_RATIO * eps + RATIO_SLACK
}

/// Flags nested groups over centers sorted ascending (group `i + 1` has
/// `sorted_centers[i]`).
pub fn detect_nested_groups(sorted_centers: &[f64], eps: f64) -> NestedSummary {
    let n = sorted_centers.len();
    let mut nested_into: Vec<Option<usize>> = vec![None; n];

    for i in 1..n {
        if is_nested_pair(sorted_centers[i - 1], sorted_centers[i], eps) {
            nested_into[i - 1] = Some(i + 1);
        }
    }

    // Walk backwards so each chain end is known before its predecessors.
    let mut executed_with = vec![0usize; n];
    for i in (0..n).rev() {
        executed_with[i] = match nested_into[i] {
            Some(target) => executed_with[target - 1],
            None => i + 1,
        };
    }

    let groups: Vec<NestedGroup> = sorted_centers
        .iter()
        .enumerate()
        .map(|(i, &center)| NestedGroup {
            group_index: i + 1,
            group_label: group_label(i + 1),
            center_efh: center,
            nested_flag: nested_into[i].is_some(),
            nested_in: nested_into[i].map(group_label),
            executed_with: executed_with[i],
        })
        .collect();

    let effective: Vec<&NestedGroup> = groups.iter().filter(|g| !g.nested_flag).collect();
    let effective_groups = effective.iter().map(|g| g.group_index).collect::<Vec<_>>();
    let effective_centers = effective.iter().map(|g| g.center_efh).collect();
    let effective_reduction = if n > 0 {
        1.0 - effective_groups.len() as f64 / n as f64
    } else {
        0.0
    };

    NestedSummary {
        groups,
        effective_groups,
        effective_centers,
        effective_reduction,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_of_doubling_centers() {
        let s = detect_nested_groups(&[100.0, 205.0, 410.0], 0.10);
        assert!(s.groups[0].nested_flag, "205/100 = 2.05 is inside [1.8, 2.2]");
        assert_eq!(s.groups[0].nested_in.as_deref(), Some("Group-2"));
        assert!(s.groups[1].nested_flag, "410/205 = 2.0");
        assert_eq!(s.groups[1].nested_in.as_deref(), Some("Group-3"));
        assert!(!s.groups[2].nested_flag);
        assert_eq!(s.groups[2].nested_in, None);

        assert_eq!(s.effective_groups, vec![3]);
        assert_eq!(s.effective_centers, vec![410.0]);
        assert!((s.effective_reduction - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_chain_resolves_to_terminal_group() {
        let s = detect_nested_groups(&[100.0, 205.0, 410.0], 0.10);
        let carried: Vec<usize> = s.groups.iter().map(|g| g.executed_with).collect();
        assert_eq!(carried, vec![3, 3, 3]);
    }

    #[test]
    fn test_window_endpoints_are_inclusive() {
        assert!(is_nested_pair(1000.0, 1800.0, 0.10));
        assert!(is_nested_pair(1000.0, 2200.0, 0.10));
        assert!(!is_nested_pair(1000.0, 1790.0, 0.10));
        assert!(!is_nested_pair(1000.0, 2210.0, 0.10));
    }

    #[test]
    fn test_narrower_eps_rejects_loose_ratio() {
        assert!(is_nested_pair(1000.0, 2150.0, 0.10));
        assert!(!is_nested_pair(1000.0, 2150.0, 0.05));
    }

    #[test]
    fn test_only_adjacent_pairs_are_compared() {
        // 500 and 1000 are a 2x pair but 700 sits between them.
        let s = detect_nested_groups(&[500.0, 700.0, 1000.0], 0.10);
        assert!(s.groups.iter().all(|g| !g.nested_flag));
        assert_eq!(s.effective_groups, vec![1, 2, 3]);
        assert_eq!(s.effective_reduction, 0.0);
    }

    #[test]
    fn test_non_positive_smaller_center_is_never_nested() {
        assert!(!is_nested_pair(0.0, 0.0, 0.10));
        assert!(!is_nested_pair(-100.0, -200.0, 0.10));
    }

    #[test]
    fn test_no_groups_means_no_reduction() {
        let s = detect_nested_groups(&[], 0.10);
        assert_eq!(s.total_groups(), 0);
        assert_eq!(s.effective_reduction, 0.0);
    }

    #[test]
    fn test_counts_add_up() {
        let centers = [250.0, 480.0, 1000.0, 1500.0, 3050.0, 7000.0];
        let s = detect_nested_groups(&centers, 0.10);
        assert_eq!(s.effective_count() + s.nested_count(), s.total_groups());
        for g in &s.groups {
            if let Some(label) = &g.nested_in {
                assert_eq!(label, &group_label(g.group_index + 1), "only the next group");
            }
        }
        let expected = 1.0 - s.effective_count() as f64 / s.total_groups() as f64;
        assert_eq!(s.effective_reduction, expected);
    }
}
