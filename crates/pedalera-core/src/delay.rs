//! Circular delay line with fractional read.
//!
//! The building block for every time-based effect in the workspace:
//! echo, flanger, and the modulated read positions both need a buffer
//! that can be tapped at a fractional number of samples behind the
//! write cursor.
//!
//! # Use Cases
//!
//! | Effect | Delay Range | Modulation |
//! |--------|-------------|------------|
//! | Flanger | 0.1-10ms | Yes (LFO) |
//! | Echo | 1-1000ms | Optional wobble |
//!
//! # Indexing
//!
//! Capacity is always a power of two so that wrapping is a single
//! bitmask AND instead of a modulo. Requested capacities are rounded
//! **up** to the next power of two; the effective capacity is reported
//! by [`DelayLine::capacity`].

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use libm::floorf;

/// Default capacity in samples (~1.36 s at 48 kHz).
pub const DEFAULT_CAPACITY: usize = 65_536;

/// Circular sample buffer with linearly interpolated fractional reads.
///
/// Writes advance the cursor by exactly one sample and overwrite the
/// oldest entry; reads never mutate the buffer. The buffer is
/// heap-allocated once at construction and never reallocates, so
/// [`write`](Self::write) and [`read`](Self::read) are real-time safe.
///
/// # Example
///
/// ```rust
/// use pedalera_core::DelayLine;
///
/// let mut delay = DelayLine::new(48000.0);
/// delay.write(1.0);
/// delay.write(0.5);
///
/// assert_eq!(delay.read(0.0), 0.5); // newest sample
/// assert_eq!(delay.read(1.0), 1.0); // one sample back
/// assert_eq!(delay.read(0.5), 0.75); // halfway between them
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Circular buffer storage; length is a power of two
    buffer: Vec<f32>,
    /// Index mask, `buffer.len() - 1`
    mask: usize,
    /// Most recently written slot
    write_pos: usize,
    /// Sample rate for millisecond conversions
    sample_rate: f32,
}

impl DelayLine {
    /// Creates a delay line with the default capacity of 65,536 samples.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_capacity(sample_rate, DEFAULT_CAPACITY)
    }

    /// Creates a delay line holding at least `capacity` samples.
    ///
    /// The actual capacity is `capacity` rounded up to the next power of
    /// two (bitmask indexing requires it); call
    /// [`capacity`](Self::capacity) for the effective value.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(sample_rate: f32, capacity: usize) -> Self {
        assert!(capacity > 0, "delay capacity must be > 0");
        let len = capacity.next_power_of_two();

        Self {
            buffer: vec![0.0; len],
            mask: len - 1,
            write_pos: 0,
            sample_rate,
        }
    }

    /// Creates a delay line sized for a maximum delay in milliseconds.
    pub fn from_max_ms(sample_rate: f32, max_ms: f32) -> Self {
        let samples = (max_ms / 1000.0 * sample_rate) as usize + 1;
        Self::with_capacity(sample_rate, samples.max(1))
    }

    /// Appends one sample, overwriting the oldest.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.write_pos = (self.write_pos + 1) & self.mask;
        self.buffer[self.write_pos] = sample;
    }

    /// Reads a sample `delay_samples` behind the write cursor with
    /// linear interpolation.
    ///
    /// With `d = floor(delay)` and `frac = delay - d`, the result is
    /// `buf[cursor-d] + (buf[cursor-d-1] - buf[cursor-d]) * frac`.
    /// `read(0.0)` returns the most recently written sample.
    ///
    /// Requests beyond the last valid tap clamp to `capacity() - 1`
    /// (the oldest retained sample); negative or non-finite requests
    /// clamp to 0. Clamping, not wraparound: a request past capacity
    /// never aliases onto newer data.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let max_delay = (self.buffer.len() - 1) as f32;
        let delay = if delay_samples.is_finite() {
            delay_samples.clamp(0.0, max_delay)
        } else {
            0.0
        };

        let d = floorf(delay) as usize;
        let frac = delay - d as f32;

        let len = self.buffer.len();
        let newer = self.buffer[(self.write_pos + len - d) & self.mask];
        let older = self.buffer[(self.write_pos + len - d - 1) & self.mask];

        newer + (older - newer) * frac
    }

    /// Reads at a delay given in milliseconds. Delegates to
    /// [`read`](Self::read) after conversion.
    #[inline]
    pub fn read_ms(&self, delay_ms: f32) -> f32 {
        self.read(self.ms_to_samples(delay_ms))
    }

    /// Converts milliseconds to (fractional) samples at this line's rate.
    #[inline]
    pub fn ms_to_samples(&self, ms: f32) -> f32 {
        ms / 1000.0 * self.sample_rate
    }

    /// Zeroes the buffer and resets the write cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Effective capacity in samples (a power of two).
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Sample rate used for millisecond conversions.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Updates the sample rate used for millisecond conversions.
    ///
    /// The buffer contents and capacity are unchanged; callers that
    /// need a different capacity at the new rate rebuild the line.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }
}
