#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How distances to zero-variance reference windows are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VariancePolicy {
    /// Fail with [`Error::UndefinedDistance`](crate::Error::UndefinedDistance)
    /// if any reference window has zero variance.
    #[default]
    Reject,
    /// Report NaN at every zero-variance reference window and carry on.
    Nan,
}

/// Configuration for matrix profile computation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatrixProfileConfig {
    /// Subsequence length.
    pub m: usize,
    /// Whether to skip trivial matches when both series are identical.
    pub ignore_trivial: bool,
    /// Zero-variance handling.
    pub variance_policy: VariancePolicy,
}

impl MatrixProfileConfig {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            ignore_trivial: true,
            variance_policy: VariancePolicy::Reject,
        }
    }

    pub fn with_ignore_trivial(mut self, ignore_trivial: bool) -> Self {
        self.ignore_trivial = ignore_trivial;
        self
    }

    pub fn with_variance_policy(mut self, policy: VariancePolicy) -> Self {
        self.variance_policy = policy;
        self
    }

    /// Exclusion zone radius applied on self-joins.
    ///
    /// A query at `idx` never matches a position `i` with `|idx - i| <= m`.
    pub fn exclusion_zone(&self) -> usize {
        if self.ignore_trivial {
            self.m
        } else {
            0
        }
    }
}

/// The matrix profile result of a join.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatrixProfile {
    /// Nearest-neighbor distance for each reference position.
    pub profile: Vec<f64>,
    /// Start index (in the query series) of the nearest neighbor.
    pub profile_index: Vec<usize>,
    /// Subsequence length used.
    pub m: usize,
    /// Whether the join was detected as a self-join.
    pub self_join: bool,
    /// Exclusion zone radius used (0 when no trivial matches were skipped).
    pub exclusion_zone: usize,
}

impl MatrixProfile {
    pub fn len(&self) -> usize {
        self.profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }

    /// Split into `(profile, profile_index)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<usize>) {
        (self.profile, self.profile_index)
    }

    /// Position with the smallest finite distance: the best-matching pair.
    pub fn motif(&self) -> Option<(usize, f64)> {
        self.finite().min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Position with the largest finite distance: the most anomalous subsequence.
    pub fn discord(&self) -> Option<(usize, f64)> {
        self.finite().max_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn finite(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.profile
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
    }
}

/// Running-minimum accumulator for the STAMP join.
///
/// Owns `Pab` and `Iab` for the whole join; each distance profile is folded
/// in place through [`ProfileAccumulator::fold`].
#[derive(Debug, Clone)]
pub(crate) struct ProfileAccumulator {
    pub distances: Vec<f64>,
    pub indices: Vec<usize>,
    exclusion_zone: Option<usize>,
}

impl ProfileAccumulator {
    /// `exclusion_zone` is `Some(radius)` on self-joins, `None` otherwise.
    pub fn new(n: usize, exclusion_zone: Option<usize>) -> Self {
        Self {
            distances: vec![f64::INFINITY; n],
            indices: vec![0; n],
            exclusion_zone,
        }
    }

    /// Fold the distance profile of query `idx` into the running minimum.
    ///
    /// Trivial matches are skipped before any comparison. A position with no
    /// match yet takes the first distance offered; afterwards only a strictly
    /// smaller distance replaces it, so ties keep the earlier query index.
    #[inline]
    pub fn fold(&mut self, idx: usize, profile: &[f64]) {
        debug_assert_eq!(profile.len(), self.distances.len());
        for (i, &d) in profile.iter().enumerate() {
            if let Some(zone) = self.exclusion_zone {
                if idx.abs_diff(i) <= zone {
                    continue;
                }
            }
            let curr = &mut self.distances[i];
            if *curr == f64::INFINITY || d < *curr {
                *curr = d;
                self.indices[i] = idx;
            }
        }
    }

    pub fn into_matrix_profile(self, m: usize, self_join: bool) -> MatrixProfile {
        MatrixProfile {
            profile: self.distances,
            profile_index: self.indices,
            m,
            self_join,
            exclusion_zone: self.exclusion_zone.unwrap_or(0),
        }
    }
}
