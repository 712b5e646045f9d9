//! Self-join matrix profile with stamp-rs.
//!
//! Builds a noisy sine wave with one injected anomaly, computes its matrix
//! profile, and reports the best motif pair and the most anomalous window.
//!
//! Run with: cargo run --release --example self_join

use std::time::Instant;

use stamp_rs::{Engine, MatrixProfileConfig};

fn main() -> stamp_rs::Result<()> {
    let n = 600;
    let m = 40;

    let mut ts: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            (t * std::f64::consts::TAU / 100.0).sin() + 0.05 * (t * 7.3).sin() * (t * 13.7).cos()
        })
        .collect();
    // Flatten part of one period into a ramp
    for (k, v) in ts[300..330].iter_mut().enumerate() {
        *v = -1.0 + k as f64 / 15.0;
    }

    let engine = Engine::new(MatrixProfileConfig::new(m));
    let start = Instant::now();
    let mp = engine.self_join(&ts)?;
    let elapsed = start.elapsed();

    println!("Time series length: {n}");
    println!("Subsequence length: {m}");
    println!("Matrix profile length: {}", mp.len());
    println!("Elapsed: {elapsed:?}");

    if let Some((idx, dist)) = mp.motif() {
        println!("\nBest matching pair:");
        println!("  Subsequence at index {idx}");
        println!("  Nearest neighbor at index {}", mp.profile_index[idx]);
        println!("  Distance: {dist:.6}");
    }

    if let Some((idx, dist)) = mp.discord() {
        println!("\nMost anomalous subsequence:");
        println!("  Index: {idx}");
        println!("  Distance: {dist:.6}");
    }

    Ok(())
}
