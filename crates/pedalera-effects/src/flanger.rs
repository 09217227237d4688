//! Classic flanger with LFO-modulated short delay.
//!
//! Mixing the input with a copy delayed by a few milliseconds produces a
//! comb filter; sweeping that delay with a low-frequency oscillator sweeps
//! the comb's notches through the spectrum, the characteristic "jet plane"
//! sound. Feedback sharpens the notches into resonant peaks.

use libm::ceilf;
use pedalera_core::{
    flush_denormal, limit_value, wet_dry_mix, DelayLine, Effect, Lfo, LfoWaveform, ParamDescriptor,
    ParamUnit, ParameterInfo, SmoothedParam,
};

/// Flanger with sine-swept delay and soft-limited feedback.
///
/// The read position is `base · (1 + lfo · depth)`, so the sweep is
/// proportional to the base delay: at full depth it covers 0 to twice the
/// base, and at depth 0 the effect degenerates to a fixed comb filter.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.05–10.0 Hz | 0.5 |
/// | 1 | Depth | 0–100% | 35.0 |
/// | 2 | Delay | 0.1–10.0 ms | 2.0 |
/// | 3 | Feedback | 0–95% | 50.0 |
/// | 4 | Mix | 0–100% | 50.0 |
///
/// # Example
///
/// ```rust
/// use pedalera_effects::Flanger;
/// use pedalera_core::Effect;
///
/// let mut flanger = Flanger::new(44100.0);
/// flanger.set_rate(0.5);
/// flanger.set_depth(0.8);
/// flanger.set_feedback(0.7);
/// flanger.set_mix(0.5);
///
/// let output = flanger.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Flanger {
    delay_line: DelayLine,
    lfo: Lfo,
    rate: SmoothedParam,
    depth: SmoothedParam,
    base_delay: SmoothedParam,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
}

impl Flanger {
    /// Minimum base delay in milliseconds.
    const MIN_DELAY_MS: f32 = 0.1;
    /// Maximum base delay in milliseconds.
    const MAX_DELAY_MS: f32 = 10.0;

    /// Create a new flanger effect.
    pub fn new(sample_rate: f32) -> Self {
        // Full-depth sweep reaches twice the base delay.
        let max_delay_samples =
            ceilf((2.0 * Self::MAX_DELAY_MS / 1000.0) * sample_rate) as usize + 1;
        let default_base_samples = (2.0 / 1000.0) * sample_rate;

        Self {
            delay_line: DelayLine::with_capacity(sample_rate, max_delay_samples),
            lfo: Lfo::new(sample_rate, 0.5),
            rate: SmoothedParam::with_config(0.5, sample_rate, 10.0),
            depth: SmoothedParam::with_config(0.35, sample_rate, 10.0),
            base_delay: SmoothedParam::with_config(default_base_samples, sample_rate, 50.0),
            feedback: SmoothedParam::with_config(0.5, sample_rate, 10.0),
            mix: SmoothedParam::with_config(0.5, sample_rate, 10.0),
            sample_rate,
        }
    }

    /// Set LFO rate in Hz (0.05-10).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate.set_target(rate_hz.clamp(0.05, 10.0));
    }

    /// Set modulation depth (0-1).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth.set_target(depth.clamp(0.0, 1.0));
    }

    /// Set base delay time in milliseconds (0.1-10).
    pub fn set_base_delay_ms(&mut self, delay_ms: f32) {
        let clamped_ms = delay_ms.clamp(Self::MIN_DELAY_MS, Self::MAX_DELAY_MS);
        self.base_delay
            .set_target((clamped_ms / 1000.0) * self.sample_rate);
    }

    /// Set feedback amount (0-0.95).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Set wet/dry mix (0-1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }
}

impl Effect for Flanger {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let rate = self.rate.advance();
        let depth = self.depth.advance();
        let base = self.base_delay.advance();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();

        self.lfo.set_frequency(rate);
        let lfo_value = self.lfo.tick(LfoWaveform::Sine);

        // Sweep proportional to the base delay; never negative because
        // |lfo · depth| <= 1.
        let delay_samples = base * (1.0 + lfo_value * depth);

        let delayed = self.delay_line.read(delay_samples);
        let feedback_signal = flush_denormal(limit_value(input + delayed * feedback));
        self.delay_line.write(feedback_signal);

        wet_dry_mix(input, delayed, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let base_ms = self.base_delay.target() / self.sample_rate * 1000.0;
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
        self.rate.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
        self.base_delay.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
        self.set_base_delay_ms(base_ms);
        self.base_delay.snap_to_target();
    }

    fn reset(&mut self) {
        self.delay_line.clear();
        self.lfo.reset();
        self.rate.snap_to_target();
        self.depth.snap_to_target();
        self.base_delay.snap_to_target();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for Flanger {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::rate_hz(0.05, 10.0, 0.5)),
            1 => Some(ParamDescriptor {
                default: 35.0,
                ..ParamDescriptor::depth()
            }),
            2 => Some(ParamDescriptor {
                name: "Delay",
                short_name: "Delay",
                unit: ParamUnit::Milliseconds,
                min: Self::MIN_DELAY_MS,
                max: Self::MAX_DELAY_MS,
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
            1 => self.depth.target() * 100.0,
            2 => self.base_delay.target() / self.sample_rate * 1000.0,
            3 => self.feedback.target() * 100.0,
            4 => self.mix.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_rate(value),
            1 => self.set_depth(value / 100.0),
            2 => self.set_base_delay_ms(value),
            3 => self.set_feedback(value / 100.0),
            4 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}
