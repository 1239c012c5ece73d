//! Compliance of each task against its group center.
//!
//! A task folds into its group when the group center is within a relative
//! band of the task's own interval. Running a task later than its due point
//! is worse than running it early, so that direction is flagged separately
//! as late risk.

use crate::model::{ComplianceStatus, ComplianceVerdict, TaskAssessment};

/// Fail-safe verdict for tasks whose interval or center cannot be trusted.
pub const UNDETERMINED: ComplianceVerdict = ComplianceVerdict {
    deviation_ratio: None,
    status: ComplianceStatus::OutOfPhase,
    late_risk: true,
};

/// Compares a task interval with its group center.
///
/// `deviation = (center - interval) / interval`; In-Group iff
/// `|deviation| <= tolerance` (inclusive). Late risk iff `center > interval`.
///
/// A missing, non-finite or non-positive interval, or a missing or
/// non-finite center, yields `UNDETERMINED`: Out-of-Phase with late risk.
pub fn assess(interval: Option<f64>, center: Option<f64>, tolerance: f64) -> ComplianceVerdict {
    let (Some(interval), Some(center)) = (interval, center) else {
        return UNDETERMINED;
    };
    if !interval.is_finite() || !center.is_finite() || interval <= 0.0 {
        return UNDETERMINED;
    }

    let deviation = (center - interval) / interval;
    let status = if deviation.abs() <= tolerance {
        ComplianceStatus::InGroup
    } else {
        ComplianceStatus::OutOfPhase
    };

    ComplianceVerdict {
        deviation_ratio: Some(deviation),
        status,
        late_risk: center > interval,
    }
}

/// Splits assessed tasks into (In-Group, Out-of-Phase), keeping order.
pub fn split_by_status(assessments: &[TaskAssessment]) -> (Vec<TaskAssessment>, Vec<TaskAssessment>) {
    assessments.iter().cloned().partition(|t| t.is_in_group())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 0.20;

    // --- In-Group -----------------------------------------------------------

    #[test]
    fn test_center_equal_to_interval_is_in_group_without_late_risk() {
        let v = assess(Some(1000.0), Some(1000.0), TOL);
        assert_eq!(v.status, ComplianceStatus::InGroup);
        assert_eq!(v.deviation_ratio, Some(0.0));
        assert!(!v.late_risk);
    }

    #[test]
    fn test_twenty_percent_late_is_inclusive_boundary() {
        let v = assess(Some(1000.0), Some(1200.0), TOL);
        assert_eq!(v.status, ComplianceStatus::InGroup, "exactly 20% must be In-Group");
        assert!(v.late_risk);
    }

    #[test]
    fn test_twenty_percent_early_is_in_group_and_not_late() {
        let v = assess(Some(1000.0), Some(800.0), TOL);
        assert_eq!(v.status, ComplianceStatus::InGroup);
        assert!(!v.late_risk);
        let dev = v.deviation_ratio.unwrap();
        assert!((dev + 0.2).abs() < 1e-12, "got {}", dev);
    }

    // --- Out-of-Phase -------------------------------------------------------

    #[test]
    fn test_thirty_percent_late_is_out_of_phase() {
        let v = assess(Some(1000.0), Some(1300.0), TOL);
        assert_eq!(v.status, ComplianceStatus::OutOfPhase);
        assert!(v.late_risk);
        let dev = v.deviation_ratio.unwrap();
        assert!((dev - 0.30).abs() < 1e-12, "got {}", dev);
    }

    #[test]
    fn test_far_early_is_out_of_phase_but_not_late() {
        let v = assess(Some(1000.0), Some(500.0), TOL);
        assert_eq!(v.status, ComplianceStatus::OutOfPhase);
        assert!(!v.late_risk);
    }

    // --- Fail-safe ----------------------------------------------------------

    #[test]
    fn test_missing_values_are_out_of_phase_with_late_risk() {
        assert_eq!(assess(None, Some(1000.0), TOL), UNDETERMINED);
        assert_eq!(assess(Some(1000.0), None, TOL), UNDETERMINED);
        assert_eq!(assess(None, None, TOL), UNDETERMINED);
    }

    #[test]
    fn test_non_positive_or_nan_interval_is_undetermined() {
        assert_eq!(assess(Some(0.0), Some(1000.0), TOL), UNDETERMINED);
        assert_eq!(assess(Some(-5.0), Some(1000.0), TOL), UNDETERMINED);
        assert_eq!(assess(Some(f64::NAN), Some(1000.0), TOL), UNDETERMINED);
        assert_eq!(assess(Some(1000.0), Some(f64::INFINITY), TOL), UNDETERMINED);
    }

    // --- Properties ---------------------------------------------------------

    #[test]
    fn test_status_matches_ratio_rule_over_a_grid() {
        for interval in [100.0, 483.0, 870.0, 2610.0, 5220.0] {
            for step in 0..=40 {
                let center = interval * (0.5 + step as f64 * 0.025);
                let v = assess(Some(interval), Some(center), TOL);
                let dev = (center - interval) / interval;
                let expected = if dev.abs() <= TOL {
                    ComplianceStatus::InGroup
                } else {
                    ComplianceStatus::OutOfPhase
                };
                assert_eq!(v.status, expected, "interval {} center {}", interval, center);
                assert_eq!(v.late_risk, center > interval);
            }
        }
    }
}
