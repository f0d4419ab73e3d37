//! PELT change-point detection with an RBF kernel cost.

use ndarray::Array2;

use crate::analysis::domain::change_point_detector::ChangePointDetector;

/// Minimum observations per segment.
const MIN_SEGMENT: usize = 2;

/// Pruned exact linear time segmentation over multivariate series.
///
/// Segment cost is the kernel within-segment scatter under an RBF kernel
/// whose bandwidth follows the median heuristic. Dynamic programming with
/// candidate pruning finds the optimal segmentation for a given penalty.
pub struct PeltDetector;

impl PeltDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PeltDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangePointDetector for PeltDetector {
    fn detect(
        &self,
        series: &Array2<f64>,
        penalty: f64,
    ) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
        if series.iter().any(|v| !v.is_finite()) {
            return Err("series contains non-finite values".into());
        }

        let n = series.nrows();
        if n < 2 * MIN_SEGMENT {
            return Ok(vec![n]);
        }

        let gram = rbf_gram(series);
        let prefix = block_prefix_sums(&gram);

        // best[t] is the optimal penalized cost of segmenting [0, t).
        let mut best = vec![f64::INFINITY; n + 1];
        let mut prev = vec![0usize; n + 1];
        best[0] = -penalty;

        let mut candidates = vec![0usize];
        for t in MIN_SEGMENT..=n {
            let mut min_cost = f64::INFINITY;
            let mut min_start = 0;
            for &s in &candidates {
                if t - s < MIN_SEGMENT {
                    continue;
                }
                let cost = best[s] + segment_cost(&prefix, s, t) + penalty;
                if cost < min_cost {
                    min_cost = cost;
                    min_start = s;
                }
            }
            best[t] = min_cost;
            prev[t] = min_start;

            // PELT pruning: a start that cannot beat the current optimum
            // even without its penalty can never be optimal later.
            candidates.retain(|&s| {
                t - s < MIN_SEGMENT || best[s] + segment_cost(&prefix, s, t) <= best[t]
            });
            if t <= n - MIN_SEGMENT {
                candidates.push(t);
            }
        }

        let mut boundaries = Vec::new();
        let mut t = n;
        while t > 0 {
            boundaries.push(t);
            t = prev[t];
        }
        boundaries.reverse();
        Ok(boundaries)
    }
}

/// RBF Gram matrix with bandwidth from the median of squared pairwise
/// distances. A degenerate (all-equal) series falls back to gamma 1.
fn rbf_gram(series: &Array2<f64>) -> Array2<f64> {
    let n = series.nrows();
    let mut sq_dists = Array2::zeros((n, n));
    let mut off_diagonal = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let mut d = 0.0;
            for k in 0..series.ncols() {
                let diff = series[[i, k]] - series[[j, k]];
                d += diff * diff;
            }
            sq_dists[[i, j]] = d;
            sq_dists[[j, i]] = d;
            off_diagonal.push(d);
        }
    }

    let gamma = match median(&mut off_diagonal) {
        Some(m) if m > 0.0 => 1.0 / m,
        _ => 1.0,
    };

    let mut gram = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            gram[[i, j]] = (-gamma * sq_dists[[i, j]]).exp();
        }
    }
    gram
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// 2-D prefix sums of the Gram matrix so any block sum is O(1).
fn block_prefix_sums(gram: &Array2<f64>) -> Array2<f64> {
    let n = gram.nrows();
    let mut prefix = Array2::zeros((n + 1, n + 1));
    for i in 0..n {
        for j in 0..n {
            prefix[[i + 1, j + 1]] =
                gram[[i, j]] + prefix[[i, j + 1]] + prefix[[i + 1, j]] - prefix[[i, j]];
        }
    }
    prefix
}

/// Kernel within-segment scatter of `[start, end)`:
/// `sum_i k(x_i, x_i) - (1/len) * sum_{i,j} k(x_i, x_j)`.
/// Diagonal entries of an RBF kernel are 1, so the first term is `len`.
fn segment_cost(prefix: &Array2<f64>, start: usize, end: usize) -> f64 {
    let len = (end - start) as f64;
    let block = prefix[[end, end]] - prefix[[start, end]] - prefix[[end, start]]
        + prefix[[start, start]];
    len - block / len
}
