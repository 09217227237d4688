//! Envelope follower for tracking signal amplitude.
//!
//! Drives gain-reduction decisions in dynamics processing. The follower
//! rectifies its input and smooths it with a one-pole filter whose time
//! constant switches between attack and release depending on signal
//! direction.

use libm::expf;

/// Peak-style amplitude follower with asymmetric attack and release.
///
/// Smoothing coefficients come from the standard one-pole relation
/// `coeff = exp(-1 / (time_ms · sample_rate / 1000))`; the envelope then
/// updates as `y[n] = coeff · y[n-1] + (1 - coeff) · |x[n]|`. A rising
/// input selects the attack coefficient, a falling one the release.
///
/// # Example
///
/// ```rust
/// use pedalera_core::EnvelopeFollower;
///
/// let mut follower = EnvelopeFollower::with_times(48000.0, 5.0, 80.0);
/// let level = follower.process(0.5);
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    value: f32,
    attack_coeff: f32,
    release_coeff: f32,
    attack_ms: f32,
    release_ms: f32,
    sample_rate: f32,
}

impl EnvelopeFollower {
    /// Creates a follower with 10 ms attack and 100 ms release.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_times(sample_rate, 10.0, 100.0)
    }

    /// Creates a follower with explicit attack and release times.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            value: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            attack_ms: attack_ms.max(0.1),
            release_ms: release_ms.max(1.0),
            sample_rate,
        };
        follower.update_coefficients();
        follower
    }

    /// Sets the attack time in milliseconds (floored at 0.1 ms).
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(0.1);
        self.update_coefficients();
    }

    /// Current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Sets the release time in milliseconds (floored at 1 ms).
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(1.0);
        self.update_coefficients();
    }

    /// Current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Updates the sample rate, rescaling both time constants.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    /// Feeds one sample and returns the updated envelope level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let magnitude = input.abs();
        let coeff = if magnitude > self.value {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.value = coeff * self.value + (1.0 - coeff) * magnitude;
        self.value
    }

    /// Current envelope level without consuming a sample.
    pub fn level(&self) -> f32 {
        self.value
    }

    /// Resets the envelope to silence.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    fn update_coefficients(&mut self) {
        self.attack_coeff = expf(-1.0 / (self.attack_ms * self.sample_rate / 1000.0));
        self.release_coeff = expf(-1.0 / (self.release_ms * self.sample_rate / 1000.0));
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
