//! Shared helpers for PackList benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use rand::{Rng, SeedableRng};

/// Generates `count` pseudo-random values of up to `max_len` bytes with a
/// fixed seed, so runs are comparable.
#[must_use]
pub fn random_values(count: usize, max_len: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xC0FFEE);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=max_len);
            (0..len).map(|_| rng.gen()).collect()
        })
        .collect()
}

/// Generates `count` moderately compressible text values, the shape real
/// list workloads tend to store.
#[must_use]
pub fn text_values(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("session:{i}:payload:{}", "abcdef".repeat(i % 8 + 1)).into_bytes())
        .collect()
}
