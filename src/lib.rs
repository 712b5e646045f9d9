pub mod algorithms;
pub mod core;
pub mod error;

pub use crate::algorithms::mass::{distance_profile, Mass};
pub use crate::core::matrix_profile::{MatrixProfile, MatrixProfileConfig, VariancePolicy};
pub use crate::core::window_stats::{QueryStats, WindowStats};
pub use crate::error::{Error, Result};

use crate::algorithms::stamp::stamp;

/// High-level facade for matrix profile computation.
///
/// # Examples
///
/// ```
/// use stamp_rs::{Engine, MatrixProfileConfig};
///
/// let ts = vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.5, 1.0, 0.0, 1.5];
/// let engine = Engine::new(MatrixProfileConfig::new(3));
/// let mp = engine.self_join(&ts).unwrap();
/// assert_eq!(mp.profile.len(), ts.len() - 3);
/// ```
pub struct Engine {
    config: MatrixProfileConfig,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: MatrixProfileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatrixProfileConfig {
        &self.config
    }

    /// Join `series_a` (reference) against `series_b` (query source).
    ///
    /// Identical series are treated as a self-join.
    pub fn join(&self, series_a: &[f64], series_b: &[f64]) -> Result<MatrixProfile> {
        stamp(series_a, series_b, &self.config)
    }

    /// Matrix profile of a series against itself, skipping trivial matches.
    pub fn self_join(&self, ts: &[f64]) -> Result<MatrixProfile> {
        stamp(ts, ts, &self.config)
    }

    /// Distance profile of `query` against `reference` under this engine's
    /// variance policy. The query length must equal the configured `m`.
    pub fn distance_profile(&self, query: &[f64], reference: &[f64]) -> Result<Vec<f64>> {
        Mass::new(reference, self.config.m, self.config.variance_policy)?.distance_profile(query)
    }
}

/// Compute the matrix profile of `series_a` against `series_b` with window
/// length `window_length` and default settings.
///
/// `1 <= window_length <= min(len(a), len(b))` is required. Returns the
/// profile and profile index (each of length `len(a) - window_length`) in a
/// [`MatrixProfile`]; use [`MatrixProfile::into_parts`] for the bare pair.
pub fn matrix_profile_join(
    series_a: &[f64],
    series_b: &[f64],
    window_length: usize,
) -> Result<MatrixProfile> {
    stamp(series_a, series_b, &MatrixProfileConfig::new(window_length))
}
