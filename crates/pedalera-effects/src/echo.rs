//! Echo with soft-clipped feedback and optional tape-style wobble.

use libm::ceilf;
use pedalera_core::{
    flush_denormal, limit_value, wet_dry_mix, DelayLine, Effect, Lfo, LfoWaveform, ParamDescriptor,
    ParamUnit, ParameterInfo, SmoothedParam,
};

/// Minimum delay time in milliseconds.
pub const MIN_DELAY_MS: f32 = 1.0;
/// Maximum delay time in milliseconds.
pub const MAX_DELAY_MS: f32 = 1000.0;
/// Maximum wobble depth in milliseconds.
pub const MAX_WOBBLE_MS: f32 = 4.0;

/// Feedback echo whose repeats pass through a polynomial soft limiter.
///
/// Each sample writes `limit_value(input + delayed · feedback)` back into
/// the delay line, so runaway feedback settles into saturation instead of
/// clipping. The wet signal is the average of input and delayed tap, which
/// keeps repeat loudness stable as feedback rises.
///
/// An optional low-frequency wobble modulates the read position by up to a
/// few milliseconds, emulating tape transport flutter. The wobble rate is
/// configuration-only; the depth is automatable.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Delay Time | 1.0–1000.0 ms | 300.0 |
/// | 1 | Feedback | 0–95% | 40.0 |
/// | 2 | Mix | 0–100% | 50.0 |
/// | 3 | Wobble | 0.0–4.0 ms | 0.0 |
///
/// # Example
///
/// ```rust
/// use pedalera_effects::Echo;
/// use pedalera_core::Effect;
///
/// let mut echo = Echo::new(44100.0);
/// echo.set_delay_time_ms(375.0);
/// echo.set_feedback(0.5);
/// echo.set_mix(0.3);
/// echo.set_wobble(0.8, 1.5); // Subtle tape flutter
///
/// let output = echo.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Echo {
    delay_line: DelayLine,
    max_delay_samples: f32,
    delay_time: SmoothedParam,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    wobble_depth: SmoothedParam,
    wobble: Lfo,
    sample_rate: f32,
}

impl Echo {
    /// Create a new echo with 1-second maximum delay.
    pub fn new(sample_rate: f32) -> Self {
        let max_delay_samples = ceilf((MAX_DELAY_MS / 1000.0) * sample_rate) as usize;
        let delay_line = DelayLine::with_capacity(sample_rate, max_delay_samples);
        let max_delay_samples_f32 = (delay_line.capacity() - 1) as f32;
        let default_delay_samples = ((300.0 / 1000.0) * sample_rate).min(max_delay_samples_f32);

        Self {
            delay_line,
            max_delay_samples: max_delay_samples_f32,
            delay_time: SmoothedParam::with_config(default_delay_samples, sample_rate, 50.0),
            feedback: SmoothedParam::with_config(0.4, sample_rate, 10.0),
            mix: SmoothedParam::with_config(0.5, sample_rate, 10.0),
            wobble_depth: SmoothedParam::with_config(0.0, sample_rate, 10.0),
            wobble: Lfo::new(sample_rate, 0.5),
            sample_rate,
        }
    }

    /// Set delay time in milliseconds (1-1000).
    pub fn set_delay_time_ms(&mut self, delay_ms: f32) {
        let clamped_ms = delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS);
        let delay_samples = (clamped_ms / 1000.0) * self.sample_rate;
        self.delay_time
            .set_target(delay_samples.min(self.max_delay_samples));
    }

    /// Set feedback amount (0-0.95).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Set wet/dry mix (0-1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Configure the wobble LFO: rate in Hz (0.05-10) and depth in
    /// milliseconds (0-4).
    ///
    /// Depth 0 disables the wobble. Depths above ~1 ms produce audible
    /// pitch warble; keep the depth sub-millisecond for subtle drift.
    pub fn set_wobble(&mut self, rate_hz: f32, depth_ms: f32) {
        self.wobble.set_frequency(rate_hz.clamp(0.05, 10.0));
        self.set_wobble_depth_ms(depth_ms);
    }

    /// Set wobble depth in milliseconds (0-4) without touching the rate.
    pub fn set_wobble_depth_ms(&mut self, depth_ms: f32) {
        self.wobble_depth
            .set_target(depth_ms.clamp(0.0, MAX_WOBBLE_MS));
    }
}

impl Effect for Echo {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delay_samples = self.delay_time.advance();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();
        let wobble_ms = self.wobble_depth.advance();

        // The LFO always runs so the wobble phase stays continuous when
        // the depth is automated up from zero.
        let wobble = self.wobble.tick(LfoWaveform::Sine) * wobble_ms;
        let read_pos = delay_samples + (wobble / 1000.0) * self.sample_rate;

        let delayed = self.delay_line.read(read_pos);
        let feedback_signal = flush_denormal(limit_value(input + delayed * feedback));
        self.delay_line.write(feedback_signal);

        let wet = (input + delayed) * 0.5;
        wet_dry_mix(input, wet, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let delay_ms = self.delay_time.target() / self.sample_rate * 1000.0;
        self.sample_rate = sample_rate;
        self.delay_time.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
        self.wobble_depth.set_sample_rate(sample_rate);
        self.wobble.set_sample_rate(sample_rate);
        // Keep the delay time in milliseconds, not in stale samples.
        self.set_delay_time_ms(delay_ms);
        self.delay_time.snap_to_target();
    }

    fn reset(&mut self) {
        self.delay_line.clear();
        self.wobble.reset();
        self.delay_time.snap_to_target();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
        self.wobble_depth.snap_to_target();
    }
}

impl ParameterInfo for Echo {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Delay Time",
                short_name: "Time",
                unit: ParamUnit::Milliseconds,
                min: MIN_DELAY_MS,
                max: MAX_DELAY_MS,
                default: 300.0,
                step: 1.0,
            }),
            1 => Some(ParamDescriptor {
                name: "Feedback",
                short_name: "Feedback",
                unit: ParamUnit::Percent,
                min: 0.0,
                max: 95.0,
                default: 40.0,
                step: 1.0,
            }),
            2 => Some(ParamDescriptor {
                name: "Mix",
                short_name: "Mix",
                unit: ParamUnit::Percent,
                min: 0.0,
                max: 100.0,
                default: 50.0,
                step: 1.0,
            }),
            3 => Some(ParamDescriptor {
                name: "Wobble",
                short_name: "Wobble",
                unit: ParamUnit::Milliseconds,
                min: 0.0,
                max: MAX_WOBBLE_MS,
                default: 0.0,
                step: 0.1,
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.delay_time.target() / self.sample_rate * 1000.0,
            1 => self.feedback.target() * 100.0,
            2 => self.mix.target() * 100.0,
            3 => self.wobble_depth.target(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_delay_time_ms(value),
            1 => self.set_feedback(value / 100.0),
            2 => self.set_mix(value / 100.0),
            3 => self.set_wobble_depth_ms(value),
            _ => {}
        }
    }
}
