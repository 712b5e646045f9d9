use log::warn;

use crate::algorithms::common::{check_series, check_window, CorrelationPlan};
use crate::core::matrix_profile::VariancePolicy;
use crate::core::window_stats::{QueryStats, WindowStats};
use crate::error::{Error, Result};

/// MASS (Mueen's Algorithm for Similarity Search) bound to one reference series.
///
/// The reference spectrum and window statistics are computed once in
/// [`Mass::new`]; every [`Mass::distance_profile`] call then costs one FFT
/// round-trip plus an O(n) combination pass.
#[derive(Clone)]
pub struct Mass {
    m: usize,
    plan: CorrelationPlan,
    stats: WindowStats,
    profile_len: usize,
}

impl Mass {
    /// Prepare `reference` for queries of length `m`.
    ///
    /// Under [`VariancePolicy::Reject`] this fails if any reported reference
    /// window is constant, before any query is processed.
    pub fn new(reference: &[f64], m: usize, policy: VariancePolicy) -> Result<Self> {
        check_series("reference", reference)?;
        check_window(m, reference.len())?;

        let profile_len = reference.len() - m;
        let stats = WindowStats::compute(reference, m);

        if let Some(window) = stats.first_constant(profile_len) {
            match policy {
                VariancePolicy::Reject => return Err(Error::UndefinedDistance { window }),
                VariancePolicy::Nan => {
                    let count = stats.constant[..profile_len].iter().filter(|&&c| c).count();
                    warn!("{count} constant reference window(s) of length {m}; distances reported as NaN");
                }
            }
        }

        let plan = CorrelationPlan::new(reference)?;

        Ok(Self {
            m,
            plan,
            stats,
            profile_len,
        })
    }

    /// Subsequence length.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Length of every distance profile: `reference.len() - m`.
    pub fn profile_len(&self) -> usize {
        self.profile_len
    }

    pub fn stats(&self) -> &WindowStats {
        &self.stats
    }

    /// Z-normalized Euclidean distance from `query` to each reference window.
    ///
    /// `query` must have exactly `m` finite values.
    pub fn distance_profile(&self, query: &[f64]) -> Result<Vec<f64>> {
        check_series("query", query)?;
        if query.len() != self.m {
            return Err(Error::InvalidWindowLength {
                m: query.len(),
                reason: "query length differs from the prepared window length",
            });
        }
        self.profile_unchecked(query)
    }

    /// Distance profile for an already-validated query of length `m`.
    pub(crate) fn profile_unchecked(&self, query: &[f64]) -> Result<Vec<f64>> {
        let q_stats = QueryStats::compute(query);

        // A constant query is compared unnormalized.
        let normalized: Vec<f64>;
        let (query, sum_q, sum_sq_q) = if q_stats.std != 0.0 {
            normalized = query
                .iter()
                .map(|x| (x - q_stats.mean) / q_stats.std)
                .collect();
            let (s, s2) = normalized
                .iter()
                .fold((0.0, 0.0), |(s, s2), &x| (s + x, s2 + x * x));
            (&normalized[..], s, s2)
        } else {
            (query, q_stats.sum, q_stats.sum_sq)
        };

        let qt = self.plan.dot_products(query)?;

        let m_f = self.m as f64;
        let WindowStats {
            sum,
            sum_sq,
            mean,
            mean_sq,
            var,
            std,
            constant,
            ..
        } = &self.stats;

        let profile = (0..self.profile_len)
            .map(|i| {
                if constant[i] {
                    return f64::NAN;
                }
                let a = (sum_sq[i] - 2.0 * sum[i] * mean[i] + m_f * mean_sq[i]) / var[i];
                let b = -2.0 * (qt[i] - sum_q * mean[i]) / std[i];
                let d2 = a + b + sum_sq_q;
                // Round-off can push a near-zero distance slightly below zero.
                // NaN must pass through: `f64::max` would turn it into 0.
                let d2 = if d2 < 0.0 { 0.0 } else { d2 };
                d2.sqrt()
            })
            .collect();

        Ok(profile)
    }
}

/// Compute the z-normalized distance profile of `query` against `reference`.
///
/// The window length is `query.len()`; the profile has `reference.len() - m`
/// entries, entry `i` comparing against `reference[i..i+m]`. Constant
/// reference windows are rejected with [`Error::UndefinedDistance`].
pub fn distance_profile(query: &[f64], reference: &[f64]) -> Result<Vec<f64>> {
    check_series("query", query)?;
    Mass::new(reference, query.len(), VariancePolicy::Reject)?.profile_unchecked(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn znorm_distance(a: &[f64], b: &[f64]) -> f64 {
        let norm = |w: &[f64]| {
            let n = w.len() as f64;
            let mu = w.iter().sum::<f64>() / n;
            let sd = (w.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / n).sqrt();
            w.iter().map(|x| (x - mu) / sd).collect::<Vec<_>>()
        };
        norm(a)
            .iter()
            .zip(norm(b).iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    #[test]
    fn test_mass_self_match() {
        let ts: Vec<f64> = (0..200)
            .map(|i| (i as f64 * 2.0 * std::f64::consts::PI / 50.0).sin())
            .collect();
        let query = &ts[50..80]; // m=30

        let dp = distance_profile(query, &ts).unwrap();
        assert_eq!(dp.len(), ts.len() - 30);
        assert!(dp[50] < 1e-6, "Self-match distance should be ~0, got {}", dp[50]);
    }

    #[test]
    fn test_mass_matches_brute_force() {
        let ts: Vec<f64> = (0..120)
            .map(|i| (i as f64 * 0.3).sin() + 0.5 * (i as f64 * 0.11).cos())
            .collect();
        let query: Vec<f64> = (0..12).map(|i| (i as f64 * 0.9).sin() * 2.0 + 3.0).collect();

        let dp = distance_profile(&query, &ts).unwrap();
        for (i, &d) in dp.iter().enumerate() {
            let expected = znorm_distance(&query, &ts[i..i + 12]);
            assert!(
                (d - expected).abs() < 1e-6,
                "Mismatch at {i}: mass={d}, brute force={expected}"
            );
        }
    }

    #[test]
    fn test_mass_distances_non_negative() {
        let ts: Vec<f64> = (0..300)
            .map(|i| (i as f64 * 0.1).sin() + (i as f64 * 0.03).cos())
            .collect();
        let dp = distance_profile(&ts[10..30], &ts).unwrap();
        for (i, &d) in dp.iter().enumerate() {
            assert!(d >= 0.0, "Distance at {i} is negative: {d}");
        }
    }

    #[test]
    fn test_mass_constant_query_is_not_normalized() {
        // For a constant query c, the formula reduces to sqrt(m + m*c^2).
        let ts: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
        let query = vec![2.0; 4];

        let dp = distance_profile(&query, &ts).unwrap();
        assert_eq!(dp.len(), 96);
        let expected = (4.0_f64 + 4.0 * 4.0).sqrt();
        for (i, &d) in dp.iter().enumerate() {
            assert!(
                (d - expected).abs() < 1e-6,
                "Constant query vs ts[{i}]: expected {expected}, got {d}"
            );
        }
    }

    #[test]
    fn test_mass_constant_reference_rejected() {
        let ts = vec![1.0; 10];
        let query = vec![1.0, 2.0, 3.0, 4.0];
        let err = distance_profile(&query, &ts).unwrap_err();
        assert!(matches!(err, Error::UndefinedDistance { window: 0 }));
    }

    #[test]
    fn test_mass_constant_reference_nan_policy() {
        let ts = vec![1.0; 10];
        let mass = Mass::new(&ts, 4, VariancePolicy::Nan).unwrap();
        let dp = mass.distance_profile(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(dp.len(), 6);
        assert!(dp.iter().all(|d| d.is_nan()));
    }

    /// Non-constant values one ulp apart around 1e8 from index 10 on, so the
    /// computed variance of every window there is lost in round-off.
    fn cancelled_variance_series() -> Vec<f64> {
        let mut ts = vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 2.0, 7.0, 1.0, 3.0];
        ts.extend((10..40).map(|i| if i % 2 == 1 { 1e8 + 1.5e-8 } else { 1e8 }));
        ts
    }

    #[test]
    fn test_mass_cancelled_variance_rejected() {
        let ts = cancelled_variance_series();
        let err = distance_profile(&[1.0, 3.0, 2.0, 5.0], &ts).unwrap_err();
        assert!(matches!(err, Error::UndefinedDistance { window: 10 }), "{err}");
    }

    #[test]
    fn test_mass_cancelled_variance_nan_policy() {
        let ts = cancelled_variance_series();
        let mass = Mass::new(&ts, 4, VariancePolicy::Nan).unwrap();
        let dp = mass.distance_profile(&[1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(dp.len(), 36);
        for (i, &d) in dp.iter().enumerate() {
            if i < 10 {
                assert!(d.is_finite(), "position {i}: {d}");
            } else {
                assert!(d.is_nan(), "position {i} should be NaN, got {d}");
            }
        }
    }

    #[test]
    fn test_mass_full_length_query_gives_empty_profile() {
        let ts = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let dp = distance_profile(&ts, &ts).unwrap();
        assert!(dp.is_empty());
    }

    #[test]
    fn test_mass_rejects_invalid_inputs() {
        let ts = vec![1.0, 2.0, 3.0];
        assert!(matches!(
            distance_profile(&[], &ts),
            Err(Error::EmptyInput { series: "query" })
        ));
        assert!(matches!(
            distance_profile(&[1.0, 2.0], &[]),
            Err(Error::EmptyInput { series: "reference" })
        ));
        assert!(matches!(
            distance_profile(&[1.0; 4], &ts),
            Err(Error::InvalidWindowLength { m: 4, .. })
        ));
        assert!(matches!(
            distance_profile(&[1.0, f64::NAN], &ts),
            Err(Error::NonFiniteInput { series: "query", index: 1 })
        ));
    }

    #[test]
    fn test_prepared_mass_checks_query_length() {
        let ts: Vec<f64> = (0..50).map(|i| (i as f64 * 0.2).sin()).collect();
        let mass = Mass::new(&ts, 5, VariancePolicy::Reject).unwrap();
        assert_eq!(mass.m(), 5);
        assert_eq!(mass.profile_len(), 45);
        assert_eq!(mass.stats().len(), 46);
        assert!(matches!(
            mass.distance_profile(&ts[0..6]),
            Err(Error::InvalidWindowLength { m: 6, .. })
        ));
    }
}
