/// Standard deviations below this are treated as zero.
const MIN_STD: f64 = 1e-15;

/// Variances at or below `VAR_REL_TOL * mean^2` are indistinguishable from
/// cancellation error in `E[x^2] - E[x]^2`.
const VAR_REL_TOL: f64 = 16.0 * f64::EPSILON;

/// Per-window summary statistics for every subsequence of length `m`.
///
/// Computed from one cumulative-sum pass and one cumulative-sum-of-squares
/// pass over the series, so each window costs O(1) instead of O(m).
/// Every vector has one entry per valid window start, `n - m + 1` in total.
#[derive(Debug, Clone)]
pub struct WindowStats {
    /// Subsequence length.
    pub m: usize,
    pub sum: Vec<f64>,
    pub sum_sq: Vec<f64>,
    pub mean: Vec<f64>,
    /// `mean[i]^2`, kept separately because the distance formula uses it directly.
    pub mean_sq: Vec<f64>,
    /// Population variance `E[x^2] - E[x]^2`, not clamped.
    pub var: Vec<f64>,
    /// Square root of the variance; round-off below zero reads as zero.
    pub std: Vec<f64>,
    /// Whether each window has zero variance: either all `m` values are equal,
    /// or the computed variance is lost in round-off.
    pub constant: Vec<bool>,
}

impl WindowStats {
    /// Compute window statistics for subsequences of length `m`.
    ///
    /// Callers validate `1 <= m <= ts.len()` beforehand.
    pub fn compute(ts: &[f64], m: usize) -> Self {
        debug_assert!(m > 0 && ts.len() >= m);

        let n = ts.len();
        let n_windows = n - m + 1;

        let mut cumsum = vec![0.0; n + 1];
        let mut cumsum_sq = vec![0.0; n + 1];
        for i in 0..n {
            cumsum[i + 1] = cumsum[i] + ts[i];
            cumsum_sq[i + 1] = cumsum_sq[i] + ts[i] * ts[i];
        }

        let mut constant = equal_runs(ts, m);

        let mut sum = Vec::with_capacity(n_windows);
        let mut sum_sq = Vec::with_capacity(n_windows);
        let mut mean = Vec::with_capacity(n_windows);
        let mut mean_sq = Vec::with_capacity(n_windows);
        let mut var = Vec::with_capacity(n_windows);
        let mut std = Vec::with_capacity(n_windows);

        let m_f = m as f64;
        for i in 0..n_windows {
            let s = cumsum[i + m] - cumsum[i];
            let s2 = cumsum_sq[i + m] - cumsum_sq[i];
            let mu = s / m_f;
            let mu2 = mu * mu;
            let v = s2 / m_f - mu2;
            sum.push(s);
            sum_sq.push(s2);
            mean.push(mu);
            mean_sq.push(mu2);
            let sigma = v.max(0.0).sqrt();
            if sigma < MIN_STD || v <= VAR_REL_TOL * mu2 {
                constant[i] = true;
            }
            var.push(v);
            std.push(sigma);
        }

        Self {
            m,
            sum,
            sum_sq,
            mean,
            mean_sq,
            var,
            std,
            constant,
        }
    }

    /// Number of windows covered.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Start index of the first zero-variance window among the first `limit` windows.
    pub fn first_constant(&self, limit: usize) -> Option<usize> {
        self.constant.iter().take(limit).position(|&c| c)
    }
}

/// Scalar statistics of a single query subsequence.
#[derive(Debug, Clone, Copy)]
pub struct QueryStats {
    pub sum: f64,
    pub sum_sq: f64,
    pub mean: f64,
    pub std: f64,
}

impl QueryStats {
    pub fn compute(query: &[f64]) -> Self {
        let m_f = query.len() as f64;
        let sum: f64 = query.iter().sum();
        let sum_sq: f64 = query.iter().map(|x| x * x).sum();
        let mean = sum / m_f;
        // A constant query has exactly zero std regardless of round-off in the mean.
        let std = if query.iter().all(|&x| x == query[0]) {
            0.0
        } else {
            (query.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / m_f).sqrt()
        };
        Self {
            sum,
            sum_sq,
            mean,
            std,
        }
    }
}

/// Flag windows whose values are all identical.
///
/// A window starting at `i` is constant iff the run of equal values starting
/// at `i` is at least `m` long. Run lengths are built right-to-left in O(n).
fn equal_runs(ts: &[f64], m: usize) -> Vec<bool> {
    let n = ts.len();
    let mut run = vec![1usize; n];
    for i in (0..n.saturating_sub(1)).rev() {
        if ts[i] == ts[i + 1] {
            run[i] = run[i + 1] + 1;
        }
    }
    run[..n - m + 1].iter().map(|&r| r >= m).collect()
}
