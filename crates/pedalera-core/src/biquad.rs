//! Biquad (bi-quadratic) filter structures.
//!
//! Second-order IIR filters configurable for the standard response
//! families (low-pass, high-pass, band-pass, notch, allpass, peaking,
//! shelving). Coefficient calculation uses the RBJ Audio EQ Cookbook
//! formulas: `w0 = 2π·f/sr`, `alpha = sin(w0)/(2Q)`, normalized by
//! `a0 = 1 + alpha` (shelves use the cookbook's own `a0`).
//!
//! Two realizations are provided:
//!
//! - [`Biquad`] - Direct Form II Transposed, two state variables.
//!   Preferred for static or slowly modulated responses.
//! - [`BiquadDf1`] - Direct Form I, four state variables, with
//!   bilinear-transform pre-warping of high cutoffs. Used where the
//!   response must stay accurate close to Nyquist (crossovers, shelves).

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf, tanf};

/// Design-side coefficient set `(b0, b1, b2, a0, a1, a2)` before
/// normalization by `a0`.
type RawCoefficients = (f32, f32, f32, f32, f32, f32);

/// Low-pass coefficients per the RBJ cookbook.
///
/// Q of 0.7071 gives a Butterworth (maximally flat) response.
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> RawCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// High-pass coefficients per the RBJ cookbook.
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> RawCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Band-pass coefficients, constant skirt gain (peak gain = Q).
pub fn bandpass_skirt_coefficients(frequency: f32, q: f32, sample_rate: f32) -> RawCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = sin_omega / 2.0;
    let b1 = 0.0;
    let b2 = -sin_omega / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Band-pass coefficients, constant 0 dB peak gain.
pub fn bandpass_peak_coefficients(frequency: f32, q: f32, sample_rate: f32) -> RawCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);

    let b0 = alpha;
    let b1 = 0.0;
    let b2 = -alpha;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Notch (band-reject) coefficients per the RBJ cookbook.
pub fn notch_coefficients(frequency: f32, q: f32, sample_rate: f32) -> RawCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);

    let b0 = 1.0;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Allpass coefficients per the RBJ cookbook.
///
/// Unity magnitude at every frequency; phase rotates 360° across the
/// spectrum with the steepest change around `frequency`.
pub fn allpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> RawCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);

    let b0 = 1.0 - alpha;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0 + alpha;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Peaking EQ coefficients per the RBJ cookbook.
///
/// Boosts or cuts around a center frequency; `gain_db` positive for
/// boost, negative for cut.
pub fn peaking_eq_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> RawCoefficients {
    let a = powf(10.0, gain_db / 40.0); // sqrt(10^(dB/20))
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha / a;

    (b0, b1, b2, a0, a1, a2)
}

/// Low-shelf coefficients per the RBJ cookbook.
pub fn low_shelf_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> RawCoefficients {
    let a = powf(10.0, gain_db / 40.0);
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);
    let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;

    let b0 = a * ((a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha);
    let b1 = 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega);
    let b2 = a * ((a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha);
    let a0 = (a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha;
    let a1 = -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega);
    let a2 = (a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// High-shelf coefficients per the RBJ cookbook.
pub fn high_shelf_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> RawCoefficients {
    let a = powf(10.0, gain_db / 40.0);
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q);
    let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;

    let b0 = a * ((a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha);
    let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega);
    let b2 = a * ((a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha);
    let a0 = (a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha;
    let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_omega);
    let a2 = (a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Biquad filter in Direct Form II Transposed.
///
/// Two state variables, one multiply-add chain per sample:
/// ```text
/// y[n] = b0·x[n] + z1
/// z1   = b1·x[n] - a1·y[n] + z2
/// z2   = b2·x[n] - a2·y[n]
/// ```
///
/// Created as a passthrough (`y[n] = x[n]`); configure with one of the
/// `set_*` response methods or raw [`set_coefficients`](Self::set_coefficients).
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    /// State accumulators
    z1: f32,
    z2: f32,

    sample_rate: f32,
}

impl Biquad {
    /// Creates a passthrough biquad at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
            sample_rate,
        }
    }

    /// Configures a low-pass response at `frequency` Hz.
    pub fn set_lowpass(&mut self, frequency: f32, q: f32) {
        self.apply(lowpass_coefficients(frequency, q, self.sample_rate));
    }

    /// Configures a high-pass response at `frequency` Hz.
    pub fn set_highpass(&mut self, frequency: f32, q: f32) {
        self.apply(highpass_coefficients(frequency, q, self.sample_rate));
    }

    /// Configures a band-pass response with constant skirt gain.
    pub fn set_bandpass_skirt(&mut self, frequency: f32, q: f32) {
        self.apply(bandpass_skirt_coefficients(frequency, q, self.sample_rate));
    }

    /// Configures a band-pass response with constant 0 dB peak gain.
    pub fn set_bandpass_peak(&mut self, frequency: f32, q: f32) {
        self.apply(bandpass_peak_coefficients(frequency, q, self.sample_rate));
    }

    /// Configures a notch response at `frequency` Hz.
    pub fn set_notch(&mut self, frequency: f32, q: f32) {
        self.apply(notch_coefficients(frequency, q, self.sample_rate));
    }

    /// Configures an allpass response centered at `frequency` Hz.
    pub fn set_allpass(&mut self, frequency: f32, q: f32) {
        self.apply(allpass_coefficients(frequency, q, self.sample_rate));
    }

    /// Sets the normalized coefficient 5-tuple directly.
    ///
    /// For custom responses designed outside the cookbook constructors.
    /// Values are used as-is (assumed already normalized by `a0`).
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) {
        self.b0 = b0;
        self.b1 = b1;
        self.b2 = b2;
        self.a1 = a1;
        self.a2 = a2;
    }

    /// Returns the current normalized coefficients `(b0, b1, b2, a1, a2)`.
    pub fn coefficients(&self) -> (f32, f32, f32, f32, f32) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Sample rate the response constructors design against.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Updates the sample rate. Coefficients are not recomputed; call a
    /// `set_*` constructor afterwards to re-design the response.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Processes a block, preserving state across the call boundary.
    ///
    /// Equivalent to calling [`process`](Self::process) per sample.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        for (out, &sample) in output.iter_mut().zip(input.iter()) {
            *out = self.process(sample);
        }
    }

    /// Zeroes filter state, leaving coefficients intact.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    fn apply(&mut self, (b0, b1, b2, a0, a1, a2): RawCoefficients) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

/// Biquad filter in Direct Form I with cutoff pre-warping.
///
/// Four state variables:
/// ```text
/// y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]
/// ```
///
/// Response constructors pre-warp the design frequency above 25 % of
/// Nyquist (`f' = (sr/π)·tan(π·f/sr)`, clamped below 98 % of Nyquist)
/// to counter the bilinear transform's frequency compression. Without
/// this, a crossover or shelf designed at, say, 16 kHz against a
/// 44.1 kHz rate lands audibly flat of its target.
#[derive(Debug, Clone, Copy)]
pub struct BiquadDf1 {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    /// Input history: x[n-1], x[n-2]
    x1: f32,
    x2: f32,
    /// Output history: y[n-1], y[n-2]
    y1: f32,
    y2: f32,

    sample_rate: f32,
}

impl BiquadDf1 {
    /// Creates a passthrough filter at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
            sample_rate,
        }
    }

    /// Configures a low-pass response at `frequency` Hz (pre-warped).
    pub fn set_lowpass(&mut self, frequency: f32, q: f32) {
        let f = self.prewarp(frequency);
        self.apply(lowpass_coefficients(f, q, self.sample_rate));
    }

    /// Configures a high-pass response at `frequency` Hz (pre-warped).
    pub fn set_highpass(&mut self, frequency: f32, q: f32) {
        let f = self.prewarp(frequency);
        self.apply(highpass_coefficients(f, q, self.sample_rate));
    }

    /// Configures a band-pass response with constant skirt gain.
    pub fn set_bandpass_skirt(&mut self, frequency: f32, q: f32) {
        let f = self.prewarp(frequency);
        self.apply(bandpass_skirt_coefficients(f, q, self.sample_rate));
    }

    /// Configures a band-pass response with constant 0 dB peak gain.
    pub fn set_bandpass_peak(&mut self, frequency: f32, q: f32) {
        let f = self.prewarp(frequency);
        self.apply(bandpass_peak_coefficients(f, q, self.sample_rate));
    }

    /// Configures a notch response at `frequency` Hz (pre-warped).
    pub fn set_notch(&mut self, frequency: f32, q: f32) {
        let f = self.prewarp(frequency);
        self.apply(notch_coefficients(f, q, self.sample_rate));
    }

    /// Configures an allpass response centered at `frequency` Hz.
    pub fn set_allpass(&mut self, frequency: f32, q: f32) {
        let f = self.prewarp(frequency);
        self.apply(allpass_coefficients(f, q, self.sample_rate));
    }

    /// Configures a peaking EQ response (`gain_db` boost or cut).
    pub fn set_peaking_eq(&mut self, frequency: f32, q: f32, gain_db: f32) {
        let f = self.prewarp(frequency);
        self.apply(peaking_eq_coefficients(f, q, gain_db, self.sample_rate));
    }

    /// Configures a low-shelf response (`gain_db` boost or cut).
    pub fn set_low_shelf(&mut self, frequency: f32, q: f32, gain_db: f32) {
        let f = self.prewarp(frequency);
        self.apply(low_shelf_coefficients(f, q, gain_db, self.sample_rate));
    }

    /// Configures a high-shelf response (`gain_db` boost or cut).
    pub fn set_high_shelf(&mut self, frequency: f32, q: f32, gain_db: f32) {
        let f = self.prewarp(frequency);
        self.apply(high_shelf_coefficients(f, q, gain_db, self.sample_rate));
    }

    /// Sets the normalized coefficient 5-tuple directly (no pre-warp).
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) {
        self.b0 = b0;
        self.b1 = b1;
        self.b2 = b2;
        self.a1 = a1;
        self.a2 = a2;
    }

    /// Returns the current normalized coefficients `(b0, b1, b2, a1, a2)`.
    pub fn coefficients(&self) -> (f32, f32, f32, f32, f32) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Sample rate the response constructors design against.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Updates the sample rate. Coefficients are not recomputed; call a
    /// `set_*` constructor afterwards to re-design the response.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Processes a block, preserving state across the call boundary.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        for (out, &sample) in output.iter_mut().zip(input.iter()) {
            *out = self.process(sample);
        }
    }

    /// Zeroes filter state, leaving coefficients intact.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Compensates bilinear-transform warping for cutoffs above a
    /// quarter of Nyquist. Result stays below 98 % of Nyquist so the
    /// design formulas remain well-conditioned.
    fn prewarp(&self, frequency: f32) -> f32 {
        let nyquist = self.sample_rate * 0.5;
        let ceiling = nyquist * 0.98;
        if frequency <= nyquist * 0.25 {
            return frequency;
        }
        let f = frequency.min(ceiling);
        let warped = self.sample_rate / PI * tanf(PI * f / self.sample_rate);
        warped.min(ceiling)
    }

    fn apply(&mut self, (b0, b1, b2, a0, a1, a2): RawCoefficients) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }
}

impl Default for BiquadDf1 {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
