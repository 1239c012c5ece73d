//! Elbow selection of the group count.
//!
//! Works on the inertia sequence alone, so it does not care which
//! partitioner produced it.

/// A candidate stops being worth it once its drop is below this fraction of
/// the first drop.
pub const ELBOW_RELATIVE_DROP: f64 = 0.1;

/// Stand-in for a first drop of exactly zero.
pub const ZERO_DROP_EPSILON: f64 = 1e-9;

/// Picks an index into `inertias` (inertia for k, k+1, ... in order).
///
/// Drop `i` is `inertias[i+1] - inertias[i]`. Each drop's magnitude is
/// divided by the first drop's magnitude, and the first candidate whose
/// relative drop is under `ELBOW_RELATIVE_DROP` wins. Without such a
/// candidate the last one wins. A single candidate is returned directly.
///
/// Returns `None` for an empty sequence.
pub fn choose_elbow(inertias: &[f64]) -> Option<usize> {
    match inertias.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }

    let drops: Vec<f64> = inertias.windows(2).map(|w| w[1] - w[0]).collect();
    let first_drop = if drops[0] != 0.0 {
        drops[0].abs()
    } else {
        ZERO_DROP_EPSILON
    };

    let chosen = drops
        .iter()
        .position(|d| d.abs() / first_drop < ELBOW_RELATIVE_DROP)
        .unwrap_or(inertias.len() - 1);
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_has_no_choice() {
        assert_eq!(choose_elbow(&[]), None);
    }

    #[test]
    fn test_single_candidate_is_chosen() {
        assert_eq!(choose_elbow(&[123.0]), Some(0));
    }

    #[test]
    fn test_elbow_at_flattening_point() {
        // k=2..6. Drops: -600, -300, -20, -10. 20/600 < 0.1 at drop index 2.
        let inertias = [1000.0, 400.0, 100.0, 80.0, 70.0];
        assert_eq!(choose_elbow(&inertias), Some(2));
    }

    #[test]
    fn test_no_flattening_picks_last_candidate() {
        let inertias = [1000.0, 500.0, 250.0, 125.0];
        assert_eq!(choose_elbow(&inertias), Some(3));
    }

    #[test]
    fn test_drop_exactly_at_ten_percent_does_not_qualify() {
        // Second drop is exactly 0.1 of the first; the rule is strictly below.
        let inertias = [1100.0, 100.0, 0.0];
        assert_eq!(choose_elbow(&inertias), Some(2));
    }

    #[test]
    fn test_zero_first_drop_selects_first_candidate() {
        let inertias = [0.0, 0.0, 0.0];
        assert_eq!(choose_elbow(&inertias), Some(0));
    }
}
