//! Scalar arithmetic on complex amplitudes.
//!
//! Thin free functions over `num_complex::Complex64` so callers that think in
//! `(re, im)` pairs get the exact operations the engine relies on.

use num_complex::Complex64;

/// Amplitude of one basis state.
pub type Amplitude = Complex64;

/// `a + b`
#[inline]
pub fn add(a: Amplitude, b: Amplitude) -> Amplitude {
    Amplitude::new(a.re + b.re, a.im + b.im)
}

/// `a * b = (a.re*b.re − a.im*b.im, a.re*b.im + a.im*b.re)`
#[inline]
pub fn multiply(a: Amplitude, b: Amplitude) -> Amplitude {
    Amplitude::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re)
}

/// Scales both components by a real factor.
#[inline]
pub fn scale(a: Amplitude, k: f64) -> Amplitude {
    Amplitude::new(a.re * k, a.im * k)
}

/// `re² + im²`
#[inline]
pub fn magnitude_squared(a: Amplitude) -> f64 {
    a.re * a.re + a.im * a.im
}

#[inline]
pub fn magnitude(a: Amplitude) -> f64 {
    magnitude_squared(a).sqrt()
}

/// `e^{iθ}`
#[inline]
pub fn phase(theta: f64) -> Amplitude {
    Amplitude::new(theta.cos(), theta.sin())
}
