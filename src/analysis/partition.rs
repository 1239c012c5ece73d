//! One-dimensional partitioning behind the group discovery.
//!
//! A `Partitioner` splits a set of intervals into `k` groups and reports the
//! within-group sum of squared deviations (inertia). The elbow selection
//! only ever looks at that inertia, so any algorithm that minimizes the same
//! objective can be plugged in.
//!
//! Two implementations:
//! - `KMeans1d` — Lloyd iterations from several deterministic seedings,
//!   keeping the best run. Fast on large task lists.
//! - `OptimalPartition1d` — exact minimum via dynamic programming over the
//!   sorted values. O(k·n²); fine for a few thousand tasks.

use crate::config::PartitionAlgorithm;

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Result of partitioning `n` values into `k` groups.
///
/// `labels[i]` indexes into `centers` for input value `i`. The order of
/// `centers` is whatever the algorithm produced; callers must not read
/// meaning into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub centers: Vec<f64>,
    pub labels: Vec<usize>,
    pub inertia: f64,
}

impl Partition {
    pub fn k(&self) -> usize {
        self.centers.len()
    }
}

pub trait Partitioner {
    fn name(&self) -> &'static str;

    /// Partition `values` into `k` groups. `k` is clamped to `1..=values.len()`;
    /// an empty input yields an empty partition.
    fn fit(&self, values: &[f64], k: usize) -> Partition;
}

/// Builds the partitioner selected in the configuration.
pub fn partitioner_for(algorithm: PartitionAlgorithm) -> Box<dyn Partitioner> {
    match algorithm {
        PartitionAlgorithm::Kmeans => Box::new(KMeans1d::default()),
        PartitionAlgorithm::Optimal => Box::new(OptimalPartition1d),
    }
}

/// Total squared deviation of each value from its assigned center.
pub fn inertia(values: &[f64], centers: &[f64], labels: &[usize]) -> f64 {
    values
        .iter()
        .zip(labels)
        .map(|(v, &l)| {
            let d = v - centers[l];
            d * d
        })
        .sum()
}

fn empty_partition() -> Partition {
    Partition {
        centers: Vec::new(),
        labels: Vec::new(),
        inertia: 0.0,
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

// ---------------------------------------------------------------------------
// Lloyd k-means
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct KMeans1d {
    pub max_iter: usize,
}

impl Default for KMeans1d {
    fn default() -> Self {
        Self { max_iter: 300 }
    }
}

impl KMeans1d {
    /// Starting centers: quantile midpoints, an even spread over the range,
    /// and a farthest-first traversal from the median.
    fn seedings(sorted: &[f64], k: usize) -> Vec<Vec<f64>> {
        let n = sorted.len();
        let min = sorted[0];
        let max = sorted[n - 1];

        let quantiles = (0..k).map(|i| sorted[((2 * i + 1) * n) / (2 * k)]).collect();

        let spread = (0..k)
            .map(|i| min + (max - min) * (i as f64 + 0.5) / k as f64)
            .collect();

        let mut farthest = vec![sorted[n / 2]];
        while farthest.len() < k {
            let next = sorted
                .iter()
                .copied()
                .max_by(|a, b| {
                    let da = distance_to_nearest(*a, &farthest);
                    let db = distance_to_nearest(*b, &farthest);
                    da.total_cmp(&db)
                })
                .unwrap_or(min);
            farthest.push(next);
        }

        vec![quantiles, spread, farthest]
    }

    fn lloyd(&self, values: &[f64], mut centers: Vec<f64>) -> Partition {
        let k = centers.len();
        let mut labels = assign_nearest(values, &centers);

        for _ in 0..self.max_iter {
            let mut sums = vec![0.0; k];
            let mut counts = vec![0usize; k];
            for (v, &l) in values.iter().zip(&labels) {
                sums[l] += v;
                counts[l] += 1;
            }
            for c in 0..k {
                if counts[c] > 0 {
                    centers[c] = sums[c] / counts[c] as f64;
                }
            }
            for c in 0..k {
                if counts[c] == 0 {
                    reseed_empty(values, &mut centers, &labels, &counts, c);
                }
            }

            let next = assign_nearest(values, &centers);
            if next == labels {
                break;
            }
            labels = next;
        }

        let inertia = inertia(values, &centers, &labels);
        Partition {
            centers,
            labels,
            inertia,
        }
    }
}

impl Partitioner for KMeans1d {
    fn name(&self) -> &'static str {
        "kmeans"
    }

    fn fit(&self, values: &[f64], k: usize) -> Partition {
        if values.is_empty() {
            return empty_partition();
        }
        let k = k.clamp(1, values.len());
        let sorted = sorted_copy(values);

        let mut best: Option<Partition> = None;
        for seed in Self::seedings(&sorted, k) {
            let candidate = self.lloyd(values, seed);
            let better = best
                .as_ref()
                .is_none_or(|b| candidate.inertia < b.inertia);
            if better {
                best = Some(candidate);
            }
        }
        best.unwrap_or_else(empty_partition)
    }
}

fn distance_to_nearest(v: f64, centers: &[f64]) -> f64 {
    centers
        .iter()
        .map(|c| (v - c).abs())
        .fold(f64::INFINITY, f64::min)
}

/// Nearest center per value; ties go to the lower center index.
fn assign_nearest(values: &[f64], centers: &[f64]) -> Vec<usize> {
    values
        .iter()
        .map(|v| {
            let mut best = 0;
            let mut best_d = f64::INFINITY;
            for (i, c) in centers.iter().enumerate() {
                let d = (v - c).abs();
                if d < best_d {
                    best = i;
                    best_d = d;
                }
            }
            best
        })
        .collect()
}

/// Moves an empty center onto the value worst served by a shared cluster.
fn reseed_empty(values: &[f64], centers: &mut [f64], labels: &[usize], counts: &[usize], empty: usize) {
    let worst = values
        .iter()
        .zip(labels)
        .filter(|(_, l)| counts[**l] > 1)
        .map(|(v, l)| (*v, (v - centers[*l]).abs()))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((v, _)) = worst {
        centers[empty] = v;
    }
}

// ---------------------------------------------------------------------------
// Exact dynamic programming
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalPartition1d;

impl Partitioner for OptimalPartition1d {
    fn name(&self) -> &'static str {
        "optimal"
    }

    fn fit(&self, values: &[f64], k: usize) -> Partition {
        let n = values.len();
        if n == 0 {
            return empty_partition();
        }
        let k = k.clamp(1, n);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        // Shift by the mean to keep the prefix sums well conditioned.
        let mean = values.iter().sum::<f64>() / n as f64;
        let mut s1 = vec![0.0; n + 1];
        let mut s2 = vec![0.0; n + 1];
        for (pos, &idx) in order.iter().enumerate() {
            let x = values[idx] - mean;
            s1[pos + 1] = s1[pos] + x;
            s2[pos + 1] = s2[pos] + x * x;
        }
        let cost = |i: usize, j: usize| -> f64 {
            let len = (j - i) as f64;
            let sum = s1[j] - s1[i];
            (s2[j] - s2[i] - sum * sum / len).max(0.0)
        };

        // dp[m][j]: best cost of splitting the first j sorted values into m groups.
        let mut dp = vec![vec![f64::INFINITY; n + 1]; k + 1];
        let mut split = vec![vec![0usize; n + 1]; k + 1];
        dp[0][0] = 0.0;
        for m in 1..=k {
            for j in m..=n {
                for i in (m - 1)..j {
                    let c = dp[m - 1][i] + cost(i, j);
                    if c < dp[m][j] {
                        dp[m][j] = c;
                        split[m][j] = i;
                    }
                }
            }
        }

        let mut bounds = Vec::with_capacity(k);
        let mut j = n;
        for m in (1..=k).rev() {
            let i = split[m][j];
            bounds.push((i, j));
            j = i;
        }
        bounds.reverse();

        let mut centers = Vec::with_capacity(k);
        let mut labels = vec![0usize; n];
        for (group, &(start, end)) in bounds.iter().enumerate() {
            let sum: f64 = order[start..end].iter().map(|&idx| values[idx]).sum();
            centers.push(sum / (end - start) as f64);
            for &idx in &order[start..end] {
                labels[idx] = group;
            }
        }

        let inertia = inertia(values, &centers, &labels);
        Partition {
            centers,
            labels,
            inertia,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn three_clusters() -> Vec<f64> {
        vec![
            510.0, 480.0, 500.0, 495.0, // ~500
            2010.0, 1990.0, 2000.0, // ~2000
            6000.0, 6100.0, 5900.0, // ~6000
        ]
    }

    fn sorted_centers(p: &Partition) -> Vec<f64> {
        sorted_copy(&p.centers)
    }

    #[test]
    fn test_kmeans_finds_obvious_clusters() {
        let p = KMeans1d::default().fit(&three_clusters(), 3);
        let centers = sorted_centers(&p);
        assert_eq!(centers.len(), 3);
        assert!((centers[0] - 496.25).abs() < 1e-9, "got {:?}", centers);
        assert!((centers[1] - 2000.0).abs() < 1e-9, "got {:?}", centers);
        assert!((centers[2] - 6000.0).abs() < 1e-9, "got {:?}", centers);
    }

    #[test]
    fn test_kmeans_matches_optimal_on_separated_data() {
        let values = three_clusters();
        for k in 1..=4 {
            let lloyd = KMeans1d::default().fit(&values, k);
            let exact = OptimalPartition1d.fit(&values, k);
            assert!(
                lloyd.inertia <= exact.inertia * (1.0 + 1e-9) + 1e-9,
                "k={}: kmeans inertia {} should reach optimal {}",
                k,
                lloyd.inertia,
                exact.inertia
            );
        }
    }

    #[test]
    fn test_optimal_inertia_never_increases_with_k() {
        let values = three_clusters();
        let mut previous = f64::INFINITY;
        for k in 1..=values.len() {
            let p = OptimalPartition1d.fit(&values, k);
            assert!(p.inertia <= previous + 1e-9, "k={} inertia {} > {}", k, p.inertia, previous);
            previous = p.inertia;
        }
        assert!(previous.abs() < 1e-9, "k=n must have zero inertia");
    }

    #[test]
    fn test_labels_point_at_reported_centers() {
        let values = three_clusters();
        for partitioner in [partitioner_for(PartitionAlgorithm::Kmeans), partitioner_for(PartitionAlgorithm::Optimal)] {
            let p = partitioner.fit(&values, 3);
            assert_eq!(p.labels.len(), values.len());
            let recomputed = inertia(&values, &p.centers, &p.labels);
            assert!((recomputed - p.inertia).abs() < 1e-6, "{}: inertia mismatch", partitioner.name());
        }
    }

    #[test]
    fn test_k_is_clamped_to_input_size() {
        let p = OptimalPartition1d.fit(&[100.0, 200.0], 5);
        assert_eq!(p.k(), 2);
        let p = KMeans1d::default().fit(&[100.0, 200.0], 5);
        assert_eq!(p.k(), 2);
        assert_eq!(p.inertia, 0.0);
    }

    #[test]
    fn test_empty_input_gives_empty_partition() {
        assert_eq!(KMeans1d::default().fit(&[], 3).k(), 0);
        assert_eq!(OptimalPartition1d.fit(&[], 3).k(), 0);
    }

    #[test]
    fn test_single_group_center_is_mean() {
        let p = OptimalPartition1d.fit(&[100.0, 200.0, 300.0], 1);
        assert_eq!(p.centers, vec![200.0]);
        assert!((p.inertia - 20_000.0).abs() < 1e-6);
    }
}
