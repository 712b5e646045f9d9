//! AB-join: locate where a short query series occurs inside a longer reference.
//!
//! Run with: cargo run --release --example ab_join

use stamp_rs::{distance_profile, matrix_profile_join};

fn main() -> stamp_rs::Result<()> {
    let reference: Vec<f64> = (0..400)
        .map(|i| {
            let t = i as f64;
            (t * 0.07).sin() + 0.5 * (t * 0.23).cos()
        })
        .collect();
    let m = 32;
    let query_series = reference[150..230].to_vec();

    let mp = matrix_profile_join(&reference, &query_series, m)?;
    println!("Reference length: {}", reference.len());
    println!("Query series length: {}", query_series.len());
    println!("Self-join: {}", mp.self_join);

    let matched = mp.profile.iter().filter(|d| **d < 1e-4).count();
    println!("Reference windows matched exactly: {matched}");

    if let Some((idx, dist)) = mp.motif() {
        println!(
            "Closest reference window {idx} <- query window {} (distance {dist:.3e})",
            mp.profile_index[idx]
        );
    }

    // A single MASS query against the same reference
    let dp = distance_profile(&query_series[..m], &reference)?;
    let (best, d) = dp
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap_or((0, f64::INFINITY));
    println!("MASS best match for the first query window: index {best}, distance {d:.3e}");

    Ok(())
}
