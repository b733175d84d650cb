// src/simulation/sampler.rs

//! Shot sampling from a final amplitude vector by inverse-CDF lookup.

use crate::core::complex::magnitude_squared;
use crate::core::{Amplitude, QlabError, Result};
use crate::simulation::results::Histogram;
use log::debug;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws `shots` independent outcomes from `|vector[i]|²` and counts them.
///
/// The distribution is taken relative to the vector's own norm, so an
/// unnormalized vector samples as if it had been renormalized first.
///
/// # Errors
/// * `InvalidDimension` if the length is zero or not a power of two.
/// * `ZeroNorm` if every amplitude is zero.
pub fn sample<R: Rng + ?Sized>(vector: &[Amplitude], shots: u64, rng: &mut R) -> Result<Histogram> {
    let len = vector.len();
    if len == 0 || !len.is_power_of_two() {
        return Err(QlabError::InvalidDimension { len });
    }
    let num_qubits = len.trailing_zeros() as usize;

    let cumulative: Vec<f64> = vector
        .iter()
        .scan(0.0, |acc, &c| {
            *acc += magnitude_squared(c);
            Some(*acc)
        })
        .collect();
    let total = cumulative[len - 1];
    if !(total > 0.0 && total.is_finite()) {
        return Err(QlabError::ZeroNorm);
    }
    // Rounding can put a draw at the very top of the range; it belongs to the
    // last outcome with non-zero weight.
    let last_nonzero = vector
        .iter()
        .rposition(|&c| magnitude_squared(c) > 0.0)
        .unwrap_or(len - 1);

    debug!("sampling {} shots over {} basis states", shots, len);
    let mut counts = vec![0u64; len];
    for _ in 0..shots {
        let u: f64 = StandardUniform.sample(rng);
        let x = u * total;
        let index = cumulative.partition_point(|&c| c <= x);
        counts[index.min(last_nonzero)] += 1;
    }

    let mut histogram = Histogram::new(num_qubits);
    for (index, &count) in counts.iter().enumerate() {
        histogram.record(index, count);
    }
    Ok(histogram)
}

/// `sample` with a `StdRng` seeded from `seed`, or the thread-local generator
/// when no seed is given.
pub fn sample_seeded(vector: &[Amplitude], shots: u64, seed: Option<u64>) -> Result<Histogram> {
    match seed {
        Some(seed) => sample(vector, shots, &mut StdRng::seed_from_u64(seed)),
        None => sample(vector, shots, &mut rand::rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_traits::Zero;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn bell() -> Vec<Amplitude> {
        let h = Amplitude::new(FRAC_1_SQRT_2, 0.0);
        vec![h, Amplitude::zero(), Amplitude::zero(), h]
    }

    #[test]
    fn test_counts_sum_to_shots() -> Result<()> {
        let hist = sample_seeded(&bell(), 1000, Some(7))?;
        assert_eq!(hist.total(), 1000);
        Ok(())
    }

    #[test]
    fn test_zero_probability_never_drawn() -> Result<()> {
        let hist = sample_seeded(&bell(), 5000, Some(11))?;
        assert_eq!(hist.count("01"), 0);
        assert_eq!(hist.count("10"), 0);
        assert!(hist.counts().values().all(|&c| c >= 1));
        Ok(())
    }

    #[test]
    fn test_reproducible_for_seed() -> Result<()> {
        let a = sample_seeded(&bell(), 256, Some(42))?;
        let b = sample_seeded(&bell(), 256, Some(42))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_basis_state_is_deterministic() -> Result<()> {
        let mut v = vec![Amplitude::zero(); 8];
        v[5] = Amplitude::new(0.0, -1.0);
        let hist = sample_seeded(&v, 100, None)?;
        assert_eq!(hist.count("101"), 100);
        assert_eq!(hist.counts().len(), 1);
        Ok(())
    }

    #[test]
    fn test_unnormalized_vector_uses_relative_weights() -> Result<()> {
        let v = vec![Amplitude::new(3.0, 0.0), Amplitude::zero()];
        let hist = sample_seeded(&v, 50, Some(1))?;
        assert_eq!(hist.count("0"), 50);
        Ok(())
    }

    #[test]
    fn test_caller_supplied_rng() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let first = sample(&bell(), 256, &mut rng)?;
        assert_eq!(first, sample_seeded(&bell(), 256, Some(42))?);

        // The generator keeps its position across calls.
        let second = sample(&bell(), 256, &mut rng)?;
        assert_eq!(second.total(), 256);
        assert_eq!(second.count("01") + second.count("10"), 0);

        let thread_drawn = sample(&bell(), 64, &mut rand::rng())?;
        assert_eq!(thread_drawn.count("00") + thread_drawn.count("11"), 64);
        Ok(())
    }

    #[test]
    fn test_skewed_distribution_converges() -> Result<()> {
        // |0.6|² = 0.36, |0.8|² = 0.64
        let v = vec![Amplitude::new(0.6, 0.0), Amplitude::new(0.0, 0.8)];
        let mut rng = StdRng::seed_from_u64(2024);
        let hist = sample(&v, 20_000, &mut rng)?;
        assert_eq!(hist.total(), 20_000);
        assert_abs_diff_eq!(hist.probability("0"), 0.36, epsilon = 0.02);
        assert_abs_diff_eq!(hist.probability("1"), 0.64, epsilon = 0.02);
        assert!(hist.count("1") > hist.count("0"));
        Ok(())
    }

    #[test]
    fn test_zero_shots() -> Result<()> {
        let hist = sample_seeded(&bell(), 0, Some(3))?;
        assert!(hist.is_empty());
        assert_eq!(hist.total(), 0);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_vectors() {
        assert_eq!(sample_seeded(&[], 10, Some(0)), Err(QlabError::InvalidDimension { len: 0 }));
        assert_eq!(
            sample_seeded(&[Amplitude::zero(); 3], 10, Some(0)),
            Err(QlabError::InvalidDimension { len: 3 })
        );
        assert_eq!(sample_seeded(&[Amplitude::zero(); 4], 10, Some(0)), Err(QlabError::ZeroNorm));
    }
}
