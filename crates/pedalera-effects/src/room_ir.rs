//! Deterministic room impulse response synthesis.
//!
//! Builds a stereo impulse response from a handful of room parameters:
//! a cluster of discrete early reflections, then an exponentially
//! decaying noise tail with frequency-dependent damping. The generator
//! is pure and seeded, so the same parameters always produce the same
//! pair of buffers; callers can rebuild an IR off the audio thread and
//! swap it into a convolver without touching disk or a sample library.
//!
//! Everything here allocates and is meant for the control plane; the
//! output buffers are plain `Vec<f32>`, one per channel.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use libm::{expf, logf, sinf};

/// Hard cap on synthesized IR length in seconds.
pub const MAX_IR_SECONDS: f32 = 10.0;

/// Level the tail envelope reaches at the nominal decay time (-60 dB).
const DECAY_FLOOR: f32 = 0.001;

/// Peak level both channels are normalized to.
const NORMALIZE_PEAK: f32 = 0.9;

/// Fixed generator seed; IR synthesis is deterministic.
const IR_SEED: u32 = 0x9E37_79B9;

/// Physical description of the simulated room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomParams {
    /// Nominal decay time in seconds at a decay scale of 1.0.
    pub base_decay: f32,
    /// Tail density, 0 (sparse, grainy) to 1 (dense, smooth).
    pub diffusion: f32,
    /// Number of discrete early reflections.
    pub early_reflections: usize,
    /// High-frequency damping, 0 (bright) to 1 (dark).
    pub hf_damping: f32,
    /// Silence before the first reflection in milliseconds.
    pub initial_delay_ms: f32,
    /// Spatial spread; larger rooms space reflections further apart.
    pub size_factor: f32,
}

impl RoomParams {
    /// Returns a copy with every field clamped to its working range.
    pub fn sanitized(&self) -> Self {
        Self {
            base_decay: self.base_decay.clamp(0.05, 10.0),
            diffusion: self.diffusion.clamp(0.0, 1.0),
            early_reflections: self.early_reflections.min(32),
            hf_damping: self.hf_damping.clamp(0.0, 1.0),
            initial_delay_ms: self.initial_delay_ms.clamp(0.0, 500.0),
            size_factor: self.size_factor.clamp(0.05, 2.0),
        }
    }
}

/// Preset room characters, small to vast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomProfile {
    Booth,
    Room,
    Hall,
    Cathedral,
}

impl RoomProfile {
    /// All profiles, small to vast.
    pub const ALL: [RoomProfile; 4] = [
        RoomProfile::Booth,
        RoomProfile::Room,
        RoomProfile::Hall,
        RoomProfile::Cathedral,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            RoomProfile::Booth => "Booth",
            RoomProfile::Room => "Room",
            RoomProfile::Hall => "Hall",
            RoomProfile::Cathedral => "Cathedral",
        }
    }

    /// Room parameters for this profile.
    pub fn params(self) -> RoomParams {
        match self {
            RoomProfile::Booth => RoomParams {
                base_decay: 0.25,
                diffusion: 0.3,
                early_reflections: 4,
                hf_damping: 0.6,
                initial_delay_ms: 2.0,
                size_factor: 0.2,
            },
            RoomProfile::Room => RoomParams {
                base_decay: 0.6,
                diffusion: 0.5,
                early_reflections: 6,
                hf_damping: 0.4,
                initial_delay_ms: 8.0,
                size_factor: 0.4,
            },
            RoomProfile::Hall => RoomParams {
                base_decay: 1.8,
                diffusion: 0.7,
                early_reflections: 8,
                hf_damping: 0.3,
                initial_delay_ms: 15.0,
                size_factor: 0.7,
            },
            RoomProfile::Cathedral => RoomParams {
                base_decay: 3.2,
                diffusion: 0.85,
                early_reflections: 10,
                hf_damping: 0.2,
                initial_delay_ms: 25.0,
                size_factor: 1.0,
            },
        }
    }
}

/// One synthesized impulse response per channel, equal lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoIr {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoIr {
    /// Length in samples of each channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when the IR holds no samples.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Xorshift32; fast, tiny state, good enough for noise tails.
struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        // Xorshift sticks at zero
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in [0, 1).
    fn next_unipolar(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1 << 24) as f32
    }

    /// Uniform in [-1, 1).
    fn next_bipolar(&mut self) -> f32 {
        self.next_unipolar() * 2.0 - 1.0
    }
}

/// Synthesizes a stereo room impulse response.
///
/// `decay_scale` stretches or shrinks the room's nominal decay; the
/// result length is `sample_rate · min(3 · decay_scale · base_decay,
/// 10 s)` samples per channel, never less than one. Early reflections
/// land at `initial_delay + i² · size_factor · 8 ms` with slight
/// deterministic jitter, panned across the pair; the tail is damped
/// noise under an exponential envelope that reaches -60 dB at the end
/// of the buffer. Both channels are normalized together to a 0.9 peak.
pub fn synthesize_room_ir(params: &RoomParams, decay_scale: f32, sample_rate: f32) -> StereoIr {
    let params = params.sanitized();
    let decay_scale = decay_scale.clamp(0.05, 4.0);
    let sample_rate = sample_rate.clamp(8000.0, 384_000.0);

    let decay_seconds = (3.0 * decay_scale * params.base_decay).min(MAX_IR_SECONDS);
    let len = ((sample_rate * decay_seconds) as usize).max(1);

    let mut left = vec![0.0f32; len];
    let mut right = vec![0.0f32; len];
    let mut rng = Xorshift32::new(IR_SEED);

    place_early_reflections(&params, sample_rate, &mut rng, &mut left, &mut right);
    render_tail(&params, sample_rate, &mut rng, &mut left, &mut right);
    normalize_pair(&mut left, &mut right);

    StereoIr { left, right }
}

fn place_early_reflections(
    params: &RoomParams,
    sample_rate: f32,
    rng: &mut Xorshift32,
    left: &mut [f32],
    right: &mut [f32],
) {
    let count = params.early_reflections;
    for i in 0..count {
        let spread_ms = (i * i) as f32 * params.size_factor * 8.0;
        let jitter_ms = (rng.next_unipolar() - 0.5) * 2.0 * params.size_factor;
        let time_ms = (params.initial_delay_ms + spread_ms + jitter_ms).max(0.0);

        let index = (time_ms * 0.001 * sample_rate) as usize;
        if index >= left.len() {
            break;
        }

        // Later reflections travelled further: distance attenuation plus
        // a linear fade across the cluster.
        let distance = 1.0 + i as f32 * params.size_factor;
        let gain = expf(-distance * 0.3) * (1.0 - i as f32 / count as f32 * 0.5);

        let pan = sinf(i as f32 * 1.618);
        left[index] += gain * (1.0 - pan) * 0.5;
        right[index] += gain * (1.0 + pan) * 0.5;
    }
}

fn render_tail(
    params: &RoomParams,
    sample_rate: f32,
    rng: &mut Xorshift32,
    left: &mut [f32],
    right: &mut [f32],
) {
    let len = left.len();
    let start =
        ((params.initial_delay_ms * 0.001 * sample_rate) as usize).min(len.saturating_sub(1));
    let span = (len - start).max(1) as f32;

    // Envelope hits the -60 dB floor exactly at the end of the buffer
    let env_rate = logf(1.0 / DECAY_FLOOR) / span;

    // Higher damping -> heavier one-pole smoothing of the tail noise
    let damp = 0.1 + 0.85 * params.hf_damping;

    let mut density = 0.2 + 0.6 * params.diffusion;
    if params.diffusion > 0.5 {
        density += (params.diffusion - 0.5) * 0.4;
    }

    let tail_gain = 0.6;
    let mut lp_left = 0.0f32;
    let mut lp_right = 0.0f32;

    for n in start..len {
        let env = expf(-((n - start) as f32) * env_rate);

        let raw_left = if rng.next_unipolar() < density {
            rng.next_bipolar()
        } else {
            0.0
        };
        let raw_right = if rng.next_unipolar() < density {
            rng.next_bipolar()
        } else {
            0.0
        };

        lp_left = damp * lp_left + (1.0 - damp) * raw_left;
        lp_right = damp * lp_right + (1.0 - damp) * raw_right;

        left[n] += lp_left * env * tail_gain;
        right[n] += lp_right * env * tail_gain;
    }
}

fn normalize_pair(left: &mut [f32], right: &mut [f32]) {
    let mut peak = 0.0f32;
    for &x in left.iter().chain(right.iter()) {
        peak = peak.max(x.abs());
    }
    if peak > 0.0 {
        let scale = NORMALIZE_PEAK / peak;
        for x in left.iter_mut().chain(right.iter_mut()) {
            *x *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ir_is_deterministic() {
        let params = RoomProfile::Hall.params();
        let a = synthesize_room_ir(&params, 1.0, 48000.0);
        let b = synthesize_room_ir(&params, 1.0, 48000.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ir_length_follows_decay() {
        let params = RoomProfile::Room.params(); // base_decay 0.6

        let full = synthesize_room_ir(&params, 1.0, 48000.0);
        let expected = 48000.0 * 3.0 * 0.6;
        assert!((full.len() as f64 - expected).abs() <= 1.0, "{}", full.len());
        assert_eq!(full.left.len(), full.right.len());

        let half = synthesize_room_ir(&params, 0.5, 48000.0);
        assert!(
            (half.len() as f64 - expected / 2.0).abs() <= 1.0,
            "{}",
            half.len()
        );
    }

    #[test]
    fn test_ir_length_is_capped() {
        // Cathedral at 4x would be 38.4 s; the cap holds it to 10 s
        let params = RoomProfile::Cathedral.params();
        let ir = synthesize_room_ir(&params, 4.0, 48000.0);
        assert_eq!(ir.len(), 480_000);
    }

    #[test]
    fn test_ir_never_empty() {
        let params = RoomParams {
            base_decay: 0.0,
            diffusion: 0.0,
            early_reflections: 0,
            hf_damping: 0.0,
            initial_delay_ms: 0.0,
            size_factor: 0.0,
        };
        let ir = synthesize_room_ir(&params, 0.0, 8000.0);
        assert!(ir.len() >= 1);
        assert!(!ir.is_empty());
    }

    #[test]
    fn test_ir_normalized_to_peak() {
        let params = RoomProfile::Hall.params();
        let ir = synthesize_room_ir(&params, 1.0, 48000.0);

        let peak = ir
            .left
            .iter()
            .chain(ir.right.iter())
            .fold(0.0f32, |m, &x| m.max(x.abs()));
        assert!((peak - 0.9).abs() < 1e-3, "peak was {peak}");
    }

    #[test]
    fn test_ir_tail_decays() {
        let params = RoomProfile::Room.params();
        let ir = synthesize_room_ir(&params, 1.0, 48000.0);

        let len = ir.len();
        let head: f32 =
            ir.left[..len / 4].iter().map(|x| x.abs()).sum::<f32>() / (len / 4) as f32;
        let tail: f32 =
            ir.left[len - len / 10..].iter().map(|x| x.abs()).sum::<f32>() / (len / 10) as f32;

        assert!(
            head > 10.0 * tail,
            "tail should be far below the head: {head} vs {tail}"
        );
    }

    #[test]
    fn test_ir_silent_before_initial_delay() {
        let params = RoomProfile::Hall.params(); // 15 ms initial delay
        let ir = synthesize_room_ir(&params, 1.0, 48000.0);

        // Reflection jitter can pull the first arrival slightly early,
        // so leave a 2 ms guard band.
        let guard = ((params.initial_delay_ms - 2.0) * 0.001 * 48000.0) as usize;
        for n in 0..guard {
            assert_eq!(ir.left[n], 0.0, "energy before initial delay at {n}");
            assert_eq!(ir.right[n], 0.0);
        }
    }

    #[test]
    fn test_ir_damping_darkens_tail() {
        let bright = RoomParams {
            hf_damping: 0.0,
            ..RoomProfile::Room.params()
        };
        let dark = RoomParams {
            hf_damping: 0.95,
            ..RoomProfile::Room.params()
        };

        let zero_crossings = |buf: &[f32]| {
            buf.windows(2)
                .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
                .count()
        };

        let bright_ir = synthesize_room_ir(&bright, 1.0, 48000.0);
        let dark_ir = synthesize_room_ir(&dark, 1.0, 48000.0);

        let bright_zc = zero_crossings(&bright_ir.left);
        let dark_zc = zero_crossings(&dark_ir.left);
        assert!(
            dark_zc * 2 < bright_zc,
            "damping should remove high frequencies: {dark_zc} vs {bright_zc}"
        );
    }

    #[test]
    fn test_ir_channels_decorrelated() {
        let params = RoomProfile::Hall.params();
        let ir = synthesize_room_ir(&params, 1.0, 48000.0);

        let diff: f32 = ir
            .left
            .iter()
            .zip(ir.right.iter())
            .map(|(l, r)| (l - r).abs())
            .sum();
        assert!(diff > 1.0, "channels should differ, total diff {diff}");
    }

    #[test]
    fn test_profiles_grow_in_size() {
        let lens: Vec<usize> = RoomProfile::ALL
            .iter()
            .map(|p| synthesize_room_ir(&p.params(), 1.0, 48000.0).len())
            .collect();

        for pair in lens.windows(2) {
            assert!(pair[0] < pair[1], "profiles out of order: {lens:?}");
        }
    }

    #[test]
    fn test_params_sanitized() {
        let wild = RoomParams {
            base_decay: 100.0,
            diffusion: -3.0,
            early_reflections: 1000,
            hf_damping: 2.0,
            initial_delay_ms: -10.0,
            size_factor: 50.0,
        };
        let clean = wild.sanitized();
        assert_eq!(clean.base_decay, 10.0);
        assert_eq!(clean.diffusion, 0.0);
        assert_eq!(clean.early_reflections, 32);
        assert_eq!(clean.hf_damping, 1.0);
        assert_eq!(clean.initial_delay_ms, 0.0);
        assert_eq!(clean.size_factor, 0.05);
    }
}
