//! Phaser built from cascaded second-order allpass filters.
//!
//! Each allpass stage leaves the magnitude spectrum untouched but rotates
//! phase around its center frequency. Mixing the cascade output with the
//! dry signal turns those phase rotations into spectral notches; sweeping
//! the shared center frequency with an LFO sweeps the notches.

use libm::{exp2f, fabsf};
use pedalera_core::{
    flush_denormal, wet_dry_mix, Biquad, Effect, Lfo, LfoWaveform, ParamDescriptor, ParamUnit,
    ParameterInfo, SmoothedParam,
};

/// Number of cascaded allpass stages.
const NUM_STAGES: usize = 4;

/// Q shared by all stages.
const ALLPASS_Q: f32 = 0.7071;

/// Four-stage allpass phaser with octave-scaled sweep.
///
/// All stages share one modulated center frequency
/// `f = center · 2^(lfo · octaves)`, so the sweep covers `octaves` above
/// and below the center symmetrically in pitch. Feedback routes the
/// previous sample's cascade output back into the chain input, sharpening
/// the notches into resonant peaks.
///
/// Allpass coefficients are recomputed only when the swept frequency has
/// moved by more than a small threshold since the last update; between
/// updates the stages keep their coefficients. The threshold trades trig
/// work for sweep granularity and can be tightened with
/// [`set_recompute_threshold_hz`](Self::set_recompute_threshold_hz).
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.05–10.0 Hz | 0.3 |
/// | 1 | Center Freq | 50–2000 Hz | 500.0 |
/// | 2 | Octaves | 0.0–4.0 | 2.0 |
/// | 3 | Feedback | 0–95% | 50.0 |
/// | 4 | Mix | 0–100% | 50.0 |
///
/// # Example
///
/// ```rust
/// use pedalera_effects::Phaser;
/// use pedalera_core::Effect;
///
/// let mut phaser = Phaser::new(44100.0);
/// phaser.set_rate(0.3);
/// phaser.set_center_freq(800.0);
/// phaser.set_octaves(2.5);
/// phaser.set_mix(0.5);
///
/// let output = phaser.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Phaser {
    stages: [Biquad; NUM_STAGES],
    lfo: Lfo,
    rate: SmoothedParam,
    center_freq: SmoothedParam,
    octaves: SmoothedParam,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    /// Cascade output from the previous sample, fed back into the chain.
    feedback_sample: f32,
    /// Swept frequency at the last coefficient update.
    last_swept_freq: f32,
    recompute_threshold: f32,
    sample_rate: f32,
}

impl Phaser {
    /// Minimum center frequency in Hz.
    const MIN_CENTER_HZ: f32 = 50.0;
    /// Maximum center frequency in Hz.
    const MAX_CENTER_HZ: f32 = 2000.0;
    /// Maximum sweep width in octaves.
    const MAX_OCTAVES: f32 = 4.0;
    /// Default recompute threshold in Hz.
    const DEFAULT_THRESHOLD_HZ: f32 = 1.0;

    /// Create a new phaser effect.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stages: [Biquad::new(sample_rate); NUM_STAGES],
            lfo: Lfo::new(sample_rate, 0.3),
            rate: SmoothedParam::with_config(0.3, sample_rate, 10.0),
            center_freq: SmoothedParam::with_config(500.0, sample_rate, 20.0),
            octaves: SmoothedParam::with_config(2.0, sample_rate, 20.0),
            feedback: SmoothedParam::with_config(0.5, sample_rate, 10.0),
            mix: SmoothedParam::with_config(0.5, sample_rate, 10.0),
            feedback_sample: 0.0,
            last_swept_freq: -1.0,
            recompute_threshold: Self::DEFAULT_THRESHOLD_HZ,
            sample_rate,
        }
    }

    /// Set LFO rate in Hz (0.05-10).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate.set_target(rate_hz.clamp(0.05, 10.0));
    }

    /// Set sweep center frequency in Hz (50-2000).
    pub fn set_center_freq(&mut self, freq_hz: f32) {
        self.center_freq
            .set_target(freq_hz.clamp(Self::MIN_CENTER_HZ, Self::MAX_CENTER_HZ));
    }

    /// Set sweep width in octaves above and below center (0-4).
    pub fn set_octaves(&mut self, octaves: f32) {
        self.octaves
            .set_target(octaves.clamp(0.0, Self::MAX_OCTAVES));
    }

    /// Set feedback amount (0-0.95).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Set wet/dry mix (0-1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Set how far the swept frequency must move, in Hz, before allpass
    /// coefficients are recomputed. Smaller values give a smoother sweep
    /// at more CPU; 0 recomputes every sample.
    pub fn set_recompute_threshold_hz(&mut self, threshold_hz: f32) {
        self.recompute_threshold = threshold_hz.clamp(0.0, 100.0);
    }
}

impl Effect for Phaser {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let rate = self.rate.advance();
        let center = self.center_freq.advance();
        let octaves = self.octaves.advance();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();

        // The LFO advances every sample regardless of whether the stages
        // pick up new coefficients, so the sweep phase never drifts.
        self.lfo.set_frequency(rate);
        let lfo_value = self.lfo.tick(LfoWaveform::Sine);

        let swept = (center * exp2f(lfo_value * octaves)).clamp(20.0, self.sample_rate * 0.45);

        if fabsf(swept - self.last_swept_freq) > self.recompute_threshold {
            self.last_swept_freq = swept;
            self.stages[0].set_allpass(swept, ALLPASS_Q);
            let (b0, b1, b2, a1, a2) = self.stages[0].coefficients();
            for stage in &mut self.stages[1..] {
                stage.set_coefficients(b0, b1, b2, a1, a2);
            }
        }

        let mut wet = input + self.feedback_sample * feedback;
        for stage in &mut self.stages {
            wet = stage.process(wet);
        }
        self.feedback_sample = flush_denormal(wet);

        wet_dry_mix(input, wet, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for stage in &mut self.stages {
            stage.set_sample_rate(sample_rate);
        }
        self.lfo.set_sample_rate(sample_rate);
        self.rate.set_sample_rate(sample_rate);
        self.center_freq.set_sample_rate(sample_rate);
        self.octaves.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
        // Force a coefficient update on the next sample.
        self.last_swept_freq = -1.0;
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
        self.lfo.reset();
        self.feedback_sample = 0.0;
        self.last_swept_freq = -1.0;
        self.rate.snap_to_target();
        self.center_freq.snap_to_target();
        self.octaves.snap_to_target();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for Phaser {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::rate_hz(0.05, 10.0, 0.3)),
            1 => Some(ParamDescriptor::frequency_hz(
                "Center Freq",
                "Center",
                Self::MIN_CENTER_HZ,
                Self::MAX_CENTER_HZ,
                500.0,
            )),
            2 => Some(ParamDescriptor {
                name: "Octaves",
                short_name: "Oct",
                unit: ParamUnit::None,
                min: 0.0,
                max: Self::MAX_OCTAVES,
                default: 2.0,
                step: 0.1,
            }),
            3 => Some(ParamDescriptor::feedback()),
            4 => Some(ParamDescriptor::mix()),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.rate.target(),
            1 => self.center_freq.target(),
            2 => self.octaves.target(),
            3 => self.feedback.target() * 100.0,
            4 => self.mix.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_rate(value),
            1 => self.set_center_freq(value),
            2 => self.set_octaves(value),
            3 => self.set_feedback(value / 100.0),
            4 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}
