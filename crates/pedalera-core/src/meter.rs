//! Level metering ballistics.
//!
//! Small per-sample trackers the processing graph and the multiband
//! compressor hang off their taps. Reads come in two flavors:
//! [`peek`](PeakMeter::peek) never disturbs state, while `drain` reports
//! and then re-arms, for "worst since I last asked" displays.

/// Peak level tracker with exponential fall-back.
///
/// New peaks register instantly; between peaks the held value decays by
/// a per-sample factor (default 0.9995, roughly 40 dB/s at 48 kHz) so
/// the display falls at a readable rate instead of sticking.
#[derive(Debug, Clone)]
pub struct PeakMeter {
    peak: f32,
    decay: f32,
}

impl PeakMeter {
    /// Per-sample decay factor applied while no larger peak arrives.
    pub const DEFAULT_DECAY: f32 = 0.9995;

    /// Creates a meter with the default decay factor.
    pub fn new() -> Self {
        Self::with_decay(Self::DEFAULT_DECAY)
    }

    /// Creates a meter with a custom decay factor in `(0, 1)`.
    pub fn with_decay(decay: f32) -> Self {
        Self {
            peak: 0.0,
            decay: decay.clamp(0.0, 1.0),
        }
    }

    /// Feeds one sample.
    #[inline]
    pub fn process(&mut self, sample: f32) {
        let magnitude = sample.abs();
        let decayed = self.peak * self.decay;
        self.peak = if magnitude > decayed { magnitude } else { decayed };
    }

    /// Current held peak, state untouched.
    #[inline]
    pub fn peek(&self) -> f32 {
        self.peak
    }

    /// Returns the held peak and clears it.
    #[inline]
    pub fn drain(&mut self) -> f32 {
        let peak = self.peak;
        self.peak = 0.0;
        peak
    }

    /// Clears the held peak.
    pub fn reset(&mut self) {
        self.peak = 0.0;
    }
}

impl Default for PeakMeter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks the deepest gain reduction applied since the last read.
///
/// Values are linear gains in `(0, 1]`; smaller means more reduction.
/// [`drain`](Self::drain) reports the worst (smallest) gain seen, then
/// re-arms the tracker at the most recent gain rather than unity, so a
/// compressor sitting in steady reduction keeps reporting it.
#[derive(Debug, Clone)]
pub struct GainReductionMeter {
    worst: f32,
    latest: f32,
}

impl GainReductionMeter {
    /// Creates a meter at unity (no reduction).
    pub fn new() -> Self {
        Self {
            worst: 1.0,
            latest: 1.0,
        }
    }

    /// Feeds the gain applied for the current sample.
    #[inline]
    pub fn update(&mut self, gain: f32) {
        self.latest = gain;
        if gain < self.worst {
            self.worst = gain;
        }
    }

    /// Worst gain since the last drain, state untouched.
    #[inline]
    pub fn peek(&self) -> f32 {
        self.worst
    }

    /// Reports the worst gain since the last drain, then re-arms at the
    /// current gain.
    #[inline]
    pub fn drain(&mut self) -> f32 {
        let worst = self.worst;
        self.worst = self.latest;
        worst
    }

    /// Returns to unity.
    pub fn reset(&mut self) {
        self.worst = 1.0;
        self.latest = 1.0;
    }
}

impl Default for GainReductionMeter {
    fn default() -> Self {
        Self::new()
    }
}

/// RMS level tracker using a one-pole mean-square average.
#[derive(Debug, Clone)]
pub struct RmsMeter {
    mean_square: f32,
    coeff: f32,
    window_ms: f32,
    sample_rate: f32,
}

impl RmsMeter {
    /// Creates a meter with a 300 ms integration window.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_window(sample_rate, 300.0)
    }

    /// Creates a meter with a custom integration window.
    pub fn with_window(sample_rate: f32, window_ms: f32) -> Self {
        let mut meter = Self {
            mean_square: 0.0,
            coeff: 0.0,
            window_ms: window_ms.max(1.0),
            sample_rate,
        };
        meter.update_coeff();
        meter
    }

    /// Feeds one sample.
    #[inline]
    pub fn process(&mut self, sample: f32) {
        let square = sample * sample;
        self.mean_square = self.coeff * self.mean_square + (1.0 - self.coeff) * square;
    }

    /// Current RMS level.
    #[inline]
    pub fn value(&self) -> f32 {
        libm::sqrtf(self.mean_square)
    }

    /// Updates the sample rate, keeping the window length.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coeff();
    }

    /// Clears the running average.
    pub fn reset(&mut self) {
        self.mean_square = 0.0;
    }

    fn update_coeff(&mut self) {
        self.coeff = libm::expf(-1.0 / (self.window_ms * self.sample_rate / 1000.0));
    }
}

/// Combined peak and RMS tracker for one channel.
///
/// The pairing every level display wants: peak for clip awareness, RMS
/// for perceived loudness.
#[derive(Debug, Clone)]
pub struct ChannelMeter {
    peak: PeakMeter,
    rms: RmsMeter,
}

impl ChannelMeter {
    /// Creates a meter with default ballistics at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            peak: PeakMeter::new(),
            rms: RmsMeter::new(sample_rate),
        }
    }

    /// Feeds one sample to both trackers.
    #[inline]
    pub fn process(&mut self, sample: f32) {
        self.peak.process(sample);
        self.rms.process(sample);
    }

    /// Feeds a whole block.
    pub fn process_block(&mut self, block: &[f32]) {
        for &sample in block {
            self.process(sample);
        }
    }

    /// Current held peak.
    #[inline]
    pub fn peak(&self) -> f32 {
        self.peak.peek()
    }

    /// Returns the held peak and re-arms the tracker.
    #[inline]
    pub fn drain_peak(&mut self) -> f32 {
        self.peak.drain()
    }

    /// Current RMS level.
    #[inline]
    pub fn rms(&self) -> f32 {
        self.rms.value()
    }

    /// Updates the sample rate of the RMS window.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.rms.set_sample_rate(sample_rate);
    }

    /// Clears both trackers.
    pub fn reset(&mut self) {
        self.peak.reset();
        self.rms.reset();
    }
}

/// Left/right pair of [`ChannelMeter`]s.
#[derive(Debug, Clone)]
pub struct StereoMeter {
    /// Left channel tracker.
    pub left: ChannelMeter,
    /// Right channel tracker.
    pub right: ChannelMeter,
}

impl StereoMeter {
    /// Creates both channel meters at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            left: ChannelMeter::new(sample_rate),
            right: ChannelMeter::new(sample_rate),
        }
    }

    /// Feeds one frame.
    #[inline]
    pub fn process(&mut self, left: f32, right: f32) {
        self.left.process(left);
        self.right.process(right);
    }

    /// Updates the sample rate of both RMS windows.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.left.set_sample_rate(sample_rate);
        self.right.set_sample_rate(sample_rate);
    }

    /// Clears both channels.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}
