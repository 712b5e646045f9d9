use log::debug;

use crate::algorithms::common::{check_series, check_window};
use crate::algorithms::mass::Mass;
use crate::core::matrix_profile::{MatrixProfile, MatrixProfileConfig, ProfileAccumulator};
use crate::error::Result;

/// Minimum number of query positions before dispatching to parallel STAMP.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_QUERIES: usize = 64;

/// Distance profiles held in memory per worker thread between folds.
#[cfg(feature = "parallel")]
const QUERIES_PER_THREAD: usize = 8;

/// Compute the matrix profile of `series_a` joined against `series_b` (STAMP).
///
/// For every query subsequence `series_b[idx..idx+m]`, `idx` in `0..len(b) - m`,
/// MASS produces a distance profile against `series_a`, which is folded into a
/// running minimum. The result has `len(a) - m` entries; `profile_index[i]`
/// is the query start that achieved `profile[i]`.
///
/// When both series are identical (and `config.ignore_trivial` is set), the
/// join is a self-join and matches with `|idx - i| <= m` are skipped.
///
/// Reference window statistics and the reference spectrum are computed once
/// for the whole join.
pub fn stamp(
    series_a: &[f64],
    series_b: &[f64],
    config: &MatrixProfileConfig,
) -> Result<MatrixProfile> {
    let m = config.m;
    check_series("reference", series_a)?;
    check_series("query", series_b)?;
    check_window(m, series_a.len())?;
    check_window(m, series_b.len())?;

    let self_join = series_a == series_b;
    let exclusion_zone = (self_join && config.ignore_trivial).then_some(config.exclusion_zone());

    let mass = Mass::new(series_a, m, config.variance_policy)?;
    let n_queries = series_b.len() - m;
    let mut acc = ProfileAccumulator::new(mass.profile_len(), exclusion_zone);

    debug!(
        "stamp: len(a)={}, len(b)={}, m={m}, queries={n_queries}, self_join={self_join}, exclusion_zone={exclusion_zone:?}",
        series_a.len(),
        series_b.len(),
    );

    #[cfg(feature = "parallel")]
    if n_queries >= MIN_PARALLEL_QUERIES {
        stamp_parallel(series_b, m, n_queries, &mass, &mut acc)?;
    } else {
        stamp_serial(series_b, m, n_queries, &mass, &mut acc)?;
    }
    #[cfg(not(feature = "parallel"))]
    stamp_serial(series_b, m, n_queries, &mass, &mut acc)?;

    let mp = acc.into_matrix_profile(m, self_join);
    debug!(
        "stamp: done, {} of {} positions matched",
        mp.profile.iter().filter(|d| !d.is_infinite()).count(),
        mp.len()
    );
    Ok(mp)
}

/// One query position at a time, folding each profile as soon as it is computed.
fn stamp_serial(
    series_b: &[f64],
    m: usize,
    n_queries: usize,
    mass: &Mass,
    acc: &mut ProfileAccumulator,
) -> Result<()> {
    for idx in 0..n_queries {
        let profile = mass.profile_unchecked(&series_b[idx..idx + m])?;
        acc.fold(idx, &profile);
    }
    Ok(())
}

/// Parallel STAMP: distance profiles for a batch of query positions are
/// computed concurrently, then folded sequentially in ascending `idx` order.
///
/// The in-order fold gives the same result as the serial loop, including
/// which index wins a tie.
#[cfg(feature = "parallel")]
fn stamp_parallel(
    series_b: &[f64],
    m: usize,
    n_queries: usize,
    mass: &Mass,
    acc: &mut ProfileAccumulator,
) -> Result<()> {
    use log::trace;
    use rayon::prelude::*;

    let batch = rayon::current_num_threads().max(1) * QUERIES_PER_THREAD;

    for start in (0..n_queries).step_by(batch) {
        let end = (start + batch).min(n_queries);
        let profiles = (start..end)
            .into_par_iter()
            .map(|idx| mass.profile_unchecked(&series_b[idx..idx + m]))
            .collect::<Result<Vec<_>>>()?;

        for (idx, profile) in (start..end).zip(profiles.iter()) {
            acc.fold(idx, profile);
        }
        trace!("stamp: folded queries {start}..{end}");
    }
    Ok(())
}
