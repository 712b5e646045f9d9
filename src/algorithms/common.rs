use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

use crate::error::{Error, Result};

/// Reject empty series and series containing NaN or infinities.
pub(crate) fn check_series(series: &'static str, ts: &[f64]) -> Result<()> {
    if ts.is_empty() {
        return Err(Error::EmptyInput { series });
    }
    match ts.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(Error::NonFiniteInput { series, index }),
        None => Ok(()),
    }
}

/// Require `1 <= m <= len`.
pub(crate) fn check_window(m: usize, len: usize) -> Result<()> {
    if m == 0 {
        return Err(Error::InvalidWindowLength {
            m,
            reason: "window length must be at least 1",
        });
    }
    if m > len {
        return Err(Error::InvalidWindowLength {
            m,
            reason: "window length exceeds series length",
        });
    }
    Ok(())
}

/// Precomputed FFT plans and reference spectrum for repeated sliding dot products.
///
/// The reference is zero-padded to `2n` and transformed once; each query only
/// pays for its own forward transform, the spectral product and one inverse.
#[derive(Clone)]
pub struct CorrelationPlan {
    n: usize,
    fft_len: usize,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
    ts_spectrum: Vec<Complex<f64>>,
}

impl CorrelationPlan {
    pub fn new(ts: &[f64]) -> Result<Self> {
        let n = ts.len();
        let fft_len = 2 * n;

        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);

        let mut ts_padded = forward.make_input_vec();
        ts_padded[..n].copy_from_slice(ts);
        let mut ts_spectrum = forward.make_output_vec();
        forward.process(&mut ts_padded, &mut ts_spectrum)?;

        Ok(Self {
            n,
            fft_len,
            forward,
            inverse,
            ts_spectrum,
        })
    }

    /// Length of the reference series.
    pub fn reference_len(&self) -> usize {
        self.n
    }

    /// Dot product of `q` with every window of the reference.
    ///
    /// Returns `n - m + 1` values; element `i` is `dot(q, ts[i..i+m])`.
    /// Callers guarantee `1 <= q.len() <= n`.
    pub fn dot_products(&self, q: &[f64]) -> Result<Vec<f64>> {
        let m = q.len();
        debug_assert!(m > 0 && m <= self.n);
        let n_windows = self.n - m + 1;

        // Reverse query into zero-padded buffer
        let mut q_padded = self.forward.make_input_vec();
        for (dst, &x) in q_padded.iter_mut().zip(q.iter().rev()) {
            *dst = x;
        }

        let mut spectrum = self.forward.make_output_vec();
        self.forward.process(&mut q_padded, &mut spectrum)?;

        for (q_val, ts_val) in spectrum.iter_mut().zip(self.ts_spectrum.iter()) {
            *q_val *= ts_val;
        }

        let mut result = self.inverse.make_output_vec();
        self.inverse.process(&mut spectrum, &mut result)?;

        // realfft inverse is unnormalized
        let norm = 1.0 / self.fft_len as f64;

        // Window i ends at convolution index i + m - 1
        Ok(result[m - 1..m - 1 + n_windows]
            .iter()
            .map(|&x| x * norm)
            .collect())
    }
}

/// Compute the sliding dot product between a query `q` and time series `ts`
/// via FFT cross-correlation in O(n log n).
///
/// Returns a vector of length `ts.len() - q.len() + 1`; when both have the same
/// length that is the single full-overlap dot product.
pub fn sliding_dot_product(q: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    check_window(q.len(), ts.len())?;
    CorrelationPlan::new(ts)?.dot_products(q)
}

/// Naive O(n*m) sliding dot product, used as a reference for the FFT path.
pub fn sliding_dot_product_naive(q: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    let m = q.len();
    check_window(m, ts.len())?;
    let n_windows = ts.len() - m + 1;

    Ok((0..n_windows)
        .map(|i| q.iter().zip(&ts[i..i + m]).map(|(a, b)| a * b).sum())
        .collect())
}
