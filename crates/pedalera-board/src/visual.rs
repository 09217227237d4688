//! Output visualization tap.
//!
//! The board writes every output sample into a fixed-size ring here;
//! [`VisualTap::snapshot`] turns the ring into an oldest-first waveform
//! plus a Hann-windowed magnitude spectrum. Snapshots are a control-plane
//! query and may allocate; the per-sample write path never does.

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Default analysis window when none is negotiated at construction.
pub const DEFAULT_VISUAL_WINDOW: usize = 1024;

const MIN_VISUAL_WINDOW: usize = 64;
const MAX_VISUAL_WINDOW: usize = 16384;

/// Time- and frequency-domain view of the most recent output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualSnapshot {
    /// The last `window` output samples, oldest first.
    pub waveform: Vec<f32>,
    /// Magnitude spectrum in dB: `window / 2` bins covering DC up to
    /// (not including) Nyquist.
    pub spectrum_db: Vec<f32>,
}

/// Ring buffer plus FFT plan for the board's visualization query.
pub(crate) struct VisualTap {
    ring: Vec<f32>,
    write_pos: usize,
    fft: Arc<dyn rustfft::Fft<f32>>,
    /// Precomputed Hann coefficients, same length as the ring.
    window: Vec<f32>,
}

impl VisualTap {
    pub(crate) fn new(size: usize) -> Self {
        let size = size.clamp(MIN_VISUAL_WINDOW, MAX_VISUAL_WINDOW);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let window = (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / size as f32).cos()))
            .collect();

        Self {
            ring: vec![0.0; size],
            write_pos: 0,
            fft,
            window,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub(crate) fn push(&mut self, sample: f32) {
        self.ring[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.ring.len() {
            self.write_pos = 0;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.ring.fill(0.0);
        self.write_pos = 0;
    }

    pub(crate) fn snapshot(&self) -> VisualSnapshot {
        let n = self.ring.len();

        // Unroll the ring so the waveform reads oldest to newest.
        let mut waveform = Vec::with_capacity(n);
        waveform.extend_from_slice(&self.ring[self.write_pos..]);
        waveform.extend_from_slice(&self.ring[..self.write_pos]);

        let mut buffer: Vec<Complex<f32>> = waveform
            .iter()
            .zip(&self.window)
            .map(|(&x, &w)| Complex::new(x * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let spectrum_db = buffer[..n / 2]
            .iter()
            .map(|c| 20.0 * (c.norm().max(1e-10)).log10())
            .collect();

        VisualSnapshot {
            waveform,
            spectrum_db,
        }
    }
}

impl std::fmt::Debug for VisualTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualTap")
            .field("size", &self.ring.len())
            .field("write_pos", &self.write_pos)
            .finish_non_exhaustive()
    }
}
