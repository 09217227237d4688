//! Harmonic exciter with separate even and odd generation paths.
//!
//! # Signal Flow
//!
//! ```text
//!          ┌─ HPF 80 Hz ──────────────────────── × dry ──┐
//! Input →  ├─ |x| → LPF 650 Hz → LPF 650 Hz ──── × even² ─┼─ Σ → out level → limiter
//!          └─ clip ±0.4 → LPF 2 kHz ──────────── × odd² ──┘
//! ```
//!
//! Full-wave rectification folds the waveform and generates even
//! harmonics plus a DC-ish bulge that the cascaded lowpass pair tames;
//! symmetric hard clipping generates odd harmonics. Each synthetic path
//! has a squared level taper so the lower half of the control range adds
//! color gently.

use libm::fabsf;
use pedalera_core::{
    hard_clip, limit_value, BiquadDf1, Effect, ParamDescriptor, ParamUnit, ParameterInfo,
    SmoothedParam,
};

/// Highpass cutoff for the fundamental path in Hz.
const FUNDAMENTAL_HPF_HZ: f32 = 80.0;

/// Lowpass cutoff after the rectifier in Hz.
const EVEN_LPF_HZ: f32 = 650.0;

/// Lowpass cutoff after the clipper in Hz.
const ODD_LPF_HZ: f32 = 2000.0;

/// Symmetric clip threshold for the odd path.
const CLIP_THRESHOLD: f32 = 0.4;

const FILTER_Q: f32 = 0.7071;

/// Three-path harmonic exciter.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default | Description |
/// |-------|------|-------|---------|-------------|
/// | 0 | Dry Level | 0-100% | 100.0 | Highpassed fundamental level |
/// | 1 | Even Harmonics | 0-100% | 30.0 | Rectifier path level (squared taper) |
/// | 2 | Odd Harmonics | 0-100% | 30.0 | Clipper path level (squared taper) |
/// | 3 | Output Level | 0-100% | 50.0 | Overall level, 50% is unity-ish |
///
/// # Example
///
/// ```rust
/// use pedalera_effects::HarmonicExciter;
/// use pedalera_core::Effect;
///
/// let mut exciter = HarmonicExciter::new(48000.0);
/// exciter.set_even_level(0.6);
/// exciter.set_odd_level(0.2);
///
/// let output = exciter.process(0.3);
/// ```
#[derive(Debug, Clone)]
pub struct HarmonicExciter {
    fundamental_hpf: BiquadDf1,
    even_lpf: [BiquadDf1; 2],
    odd_lpf: BiquadDf1,
    dry_level: SmoothedParam,
    even_level: SmoothedParam,
    odd_level: SmoothedParam,
    output_level: SmoothedParam,
    sample_rate: f32,
}

impl HarmonicExciter {
    /// Creates an exciter with a mostly-dry factory setting.
    pub fn new(sample_rate: f32) -> Self {
        let mut exciter = Self {
            fundamental_hpf: BiquadDf1::new(sample_rate),
            even_lpf: [BiquadDf1::new(sample_rate); 2],
            odd_lpf: BiquadDf1::new(sample_rate),
            dry_level: SmoothedParam::with_config(1.0, sample_rate, 10.0),
            even_level: SmoothedParam::with_config(0.3, sample_rate, 10.0),
            odd_level: SmoothedParam::with_config(0.3, sample_rate, 10.0),
            output_level: SmoothedParam::with_config(0.5, sample_rate, 10.0),
            sample_rate,
        };
        exciter.design_filters();
        exciter
    }

    fn design_filters(&mut self) {
        self.fundamental_hpf.set_highpass(FUNDAMENTAL_HPF_HZ, FILTER_Q);
        for filter in &mut self.even_lpf {
            filter.set_lowpass(EVEN_LPF_HZ, FILTER_Q);
        }
        self.odd_lpf.set_lowpass(ODD_LPF_HZ, FILTER_Q);
    }

    /// Set the fundamental path level (0-1).
    pub fn set_dry_level(&mut self, level: f32) {
        self.dry_level.set_target(level.clamp(0.0, 1.0));
    }

    /// Set the even-harmonic path level (0-1, squared taper).
    pub fn set_even_level(&mut self, level: f32) {
        self.even_level.set_target(level.clamp(0.0, 1.0));
    }

    /// Set the odd-harmonic path level (0-1, squared taper).
    pub fn set_odd_level(&mut self, level: f32) {
        self.odd_level.set_target(level.clamp(0.0, 1.0));
    }

    /// Set the output level (0-1); 1.0 doubles the summed signal
    /// relative to 0.0.
    pub fn set_output_level(&mut self, level: f32) {
        self.output_level.set_target(level.clamp(0.0, 1.0));
    }
}

impl Effect for HarmonicExciter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let dry_level = self.dry_level.advance();
        let even_level = self.even_level.advance();
        let odd_level = self.odd_level.advance();
        let output_level = self.output_level.advance();

        let fundamental = self.fundamental_hpf.process(input) * dry_level;

        let rectified_stage = self.even_lpf[0].process(fabsf(input));
        let rectified = self.even_lpf[1].process(rectified_stage);
        let even = rectified * even_level * even_level;

        let clipped = self.odd_lpf.process(hard_clip(input, CLIP_THRESHOLD));
        let odd = clipped * odd_level * odd_level;

        let sum = (fundamental + even + odd) * (0.5 + output_level * 0.5);
        limit_value(sum)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.fundamental_hpf.set_sample_rate(sample_rate);
        for filter in &mut self.even_lpf {
            filter.set_sample_rate(sample_rate);
        }
        self.odd_lpf.set_sample_rate(sample_rate);
        self.design_filters();

        self.dry_level.set_sample_rate(sample_rate);
        self.even_level.set_sample_rate(sample_rate);
        self.odd_level.set_sample_rate(sample_rate);
        self.output_level.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.fundamental_hpf.reset();
        for filter in &mut self.even_lpf {
            filter.reset();
        }
        self.odd_lpf.reset();
        self.dry_level.snap_to_target();
        self.even_level.snap_to_target();
        self.odd_level.snap_to_target();
        self.output_level.snap_to_target();
    }
}

impl ParameterInfo for HarmonicExciter {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Dry Level",
                short_name: "Dry",
                unit: ParamUnit::Percent,
                min: 0.0,
                max: 100.0,
                default: 100.0,
                step: 1.0,
            }),
            1 => Some(ParamDescriptor {
                name: "Even Harmonics",
                short_name: "Even",
                unit: ParamUnit::Percent,
                min: 0.0,
                max: 100.0,
                default: 30.0,
                step: 1.0,
            }),
            2 => Some(ParamDescriptor {
                name: "Odd Harmonics",
                short_name: "Odd",
                unit: ParamUnit::Percent,
                min: 0.0,
                max: 100.0,
                default: 30.0,
                step: 1.0,
            }),
            3 => Some(ParamDescriptor {
                name: "Output Level",
                short_name: "Level",
                unit: ParamUnit::Percent,
                min: 0.0,
                max: 100.0,
                default: 50.0,
                step: 1.0,
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.dry_level.target() * 100.0,
            1 => self.even_level.target() * 100.0,
            2 => self.odd_level.target() * 100.0,
            3 => self.output_level.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_dry_level(value / 100.0),
            1 => self.set_even_level(value / 100.0),
            2 => self.set_odd_level(value / 100.0),
            3 => self.set_output_level(value / 100.0),
            _ => (),
        }
    }
}
