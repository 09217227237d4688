//! Low Frequency Oscillator for modulation effects.
//!
//! Provides periodic modulation signals for flangers, phasers, and
//! delay-time wobble. Phase accumulation keeps the oscillator cheap and
//! drift-free at any rate.

use core::f32::consts::PI;
use libm::{floorf, sinf};

/// LFO waveform type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    #[default]
    Sine,
    Triangle,
    Saw,
}

/// Low Frequency Oscillator built on a wrapping phase accumulator.
///
/// The waveform is chosen per tick rather than stored, so one oscillator
/// can feed several shapes without duplicating phase state. Output
/// ranges differ by shape:
///
/// - **Sine**: `sin(2π·phase)`, bipolar `[-1.0, 1.0]`
/// - **Triangle**: linear up then down, bipolar `[-1.0, 1.0]`
/// - **Saw**: the raw rising phase ramp, unipolar `[0.0, 1.0)`
///
/// Saw stays unipolar on purpose: it maps directly onto delay-time and
/// frequency sweeps that must never go negative.
///
/// # Example
///
/// ```rust
/// use pedalera_core::{Lfo, LfoWaveform};
///
/// let mut lfo = Lfo::new(44100.0, 2.0); // 2 Hz
/// let value = lfo.tick(LfoWaveform::Sine);
/// assert!(value.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    /// Sample rate in Hz
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Highest accepted oscillation rate. Matches the shortest accepted
    /// period ([`MIN_PERIOD_MS`](Self::MIN_PERIOD_MS)).
    pub const MAX_FREQUENCY_HZ: f32 = 10_000.0;

    /// Shortest accepted period in milliseconds.
    pub const MIN_PERIOD_MS: f32 = 0.1;

    /// Create new LFO with given sample rate and frequency
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut lfo = Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate,
        };
        lfo.set_frequency(freq_hz);
        lfo
    }

    /// Set frequency in Hz, clamped to `[0, 10_000]`.
    ///
    /// Non-finite input leaves the rate at zero rather than poisoning
    /// the phase accumulator.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        let freq = if freq_hz.is_finite() {
            freq_hz.clamp(0.0, Self::MAX_FREQUENCY_HZ)
        } else {
            0.0
        };
        self.phase_inc = freq / self.sample_rate;
    }

    /// Set the rate by period length in milliseconds, floored at 0.1 ms.
    pub fn set_period_ms(&mut self, period_ms: f32) {
        let ms = if period_ms.is_finite() {
            period_ms.max(Self::MIN_PERIOD_MS)
        } else {
            Self::MIN_PERIOD_MS
        };
        self.set_frequency(1000.0 / ms);
    }

    /// Get current frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Reset phase to 0
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Sync phase to a specific value (0.0 - 1.0)
    ///
    /// Useful for phase-offset LFOs in multi-voice effects.
    /// 0.0 = 0°, 0.25 = 90°, 0.5 = 180°, 0.75 = 270°
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.clamp(0.0, 1.0);
    }

    /// Get current phase (0.0 - 1.0)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance the phase by one sample, then evaluate `waveform` at the
    /// new position.
    #[inline]
    pub fn tick(&mut self, waveform: LfoWaveform) -> f32 {
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
        }

        match waveform {
            LfoWaveform::Sine => sinf(self.phase * 2.0 * PI),

            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }

            LfoWaveform::Saw => self.phase,
        }
    }

    /// Set sample rate, preserving the configured frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.phase_inc * self.sample_rate;
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }
}
