//! Mathematical utility functions for DSP.
//!
//! Allocation-free conversions and blends shared by the effect
//! implementations. Everything here is `no_std`-safe and uses `libm`
//! for transcendental functions.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Utilities
//!
//! - [`lerp`] - Linear interpolation
//! - [`hard_clip`] - Symmetric value limiting
//! - [`ms_to_samples`] / [`samples_to_ms`] - Time conversions
//! - [`wet_dry_mix`] - Dry/wet blending
//! - [`flush_denormal`] - Subnormal float protection for feedback loops

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0.
///
/// # Example
/// ```rust
/// use pedalera_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Input is floored at 1e-10 so silence maps to a large negative dB
/// value instead of -inf.
///
/// # Example
/// ```rust
/// use pedalera_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Linear interpolation between two values.
///
/// `t = 0` returns `a`, `t = 1` returns `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hard clip to the symmetric range `[-threshold, threshold]`.
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Convert milliseconds to samples at the given sample rate.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Convert samples to milliseconds at the given sample rate.
#[inline]
pub fn samples_to_ms(samples: f32, sample_rate: f32) -> f32 {
    samples * 1000.0 / sample_rate
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats (~1e-38 to 1e-45) cause severe CPU performance
/// degradation on most architectures. This replaces values below 1e-20
/// with zero, leaving margin before the IEEE 754 subnormal range begins.
///
/// Use in feedback loops (delay lines, allpass chains) where signal can
/// decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix` but with one fewer
/// multiply: `dry + (wet - dry) * mix`.
///
/// `mix` is the blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}
