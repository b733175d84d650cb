// src/validation/mod.rs

//! Normalization helpers for amplitude vectors.
//!
//! The engine never enforces normalization. These functions report facts so the
//! caller can decide what to do (warn, prompt, renormalize).

use crate::core::complex::{magnitude_squared, scale};
use crate::core::{Amplitude, QlabError, Result};
use num_traits::{One, Zero};

/// Default tolerance for `check_normalization`.
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Below this squared norm a vector is treated as all-zero.
const ZERO_NORM_EPSILON: f64 = 1e-12;

/// `Σ |amplitude|²`
pub fn norm_squared(vector: &[Amplitude]) -> f64 {
    vector.iter().map(|&c| magnitude_squared(c)).sum()
}

/// Checks that the vector is normalized within `tolerance` (default 1e-9).
///
/// # Returns
/// * `Ok(())` if `|Σ|c_i|² − 1| <= tolerance`.
/// * `Err(QlabError::NotNormalized)` otherwise.
pub fn check_normalization(vector: &[Amplitude], tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq = norm_squared(vector);
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(QlabError::NotNormalized { norm_squared: norm_sq })
    } else {
        Ok(())
    }
}

/// Returns a unit-norm copy of `vector`.
///
/// An all-zero vector becomes the basis state |0…0⟩.
pub fn normalize(vector: &[Amplitude]) -> Vec<Amplitude> {
    let norm_sq = norm_squared(vector);
    if norm_sq < ZERO_NORM_EPSILON {
        let mut basis = vec![Amplitude::zero(); vector.len()];
        if let Some(first) = basis.first_mut() {
            *first = Amplitude::one();
        }
        return basis;
    }
    let k = 1.0 / norm_sq.sqrt();
    vector.iter().map(|&c| scale(c, k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_squared() {
        let v = [Amplitude::new(0.6, 0.0), Amplitude::new(0.0, 0.8)];
        assert_abs_diff_eq!(norm_squared(&v), 1.0, epsilon = 1e-12);
        assert!(check_normalization(&v, None).is_ok());
    }

    #[test]
    fn test_not_normalized_reported() {
        let v = [Amplitude::new(1.0, 0.0), Amplitude::new(1.0, 0.0)];
        assert_eq!(
            check_normalization(&v, Some(0.01)),
            Err(QlabError::NotNormalized { norm_squared: 2.0 })
        );
    }

    #[test]
    fn test_normalize_scales() {
        let v = [Amplitude::new(3.0, 0.0), Amplitude::new(0.0, 4.0)];
        let n = normalize(&v);
        assert_abs_diff_eq!(n[0].re, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(n[1].im, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_squared(&n), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let n = normalize(&[Amplitude::zero(); 4]);
        assert_eq!(n[0], Amplitude::one());
        assert!(n[1..].iter().all(|c| c.is_zero()));
    }
}
