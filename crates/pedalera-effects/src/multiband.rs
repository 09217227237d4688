//! Four-band dynamics compressor with Linkwitz-Riley crossovers.
//!
//! # Signal Flow
//!
//! ```text
//!          ┌─ low ──────→ BandCompressor ─┐
//! Input →  ├─ low-mid ──→ BandCompressor ─┤
//! (split)  ├─ high-mid ─→ BandCompressor ─┼─→ Σ → Output
//!          └─ high ─────→ BandCompressor ─┘
//! ```
//!
//! The splitter is a serial tree of 4th-order Linkwitz-Riley crossovers:
//! each split is two cascaded Butterworth biquads per branch, so the two
//! branches are each -6 dB at the crossover and sum back allpass-flat.
//! Each band then runs an independent envelope-driven gain computer with
//! its own metering, plus mute and solo switching at the summing stage.

use core::array;

use pedalera_core::{
    db_to_linear, linear_to_db, BiquadDf1, Effect, EnvelopeFollower, GainReductionMeter,
    ParamDescriptor, ParamUnit, ParameterInfo, PeakMeter,
};

/// Number of frequency bands.
pub const NUM_BANDS: usize = 4;

/// Number of crossover points (always `NUM_BANDS - 1`).
pub const NUM_CROSSOVERS: usize = 3;

/// Automatable parameters per band.
const PARAMS_PER_BAND: usize = 7;

/// Butterworth Q for each half of a Linkwitz-Riley 4th-order section.
const BUTTERWORTH_Q: f32 = 0.7071;

/// Per-sample one-pole factor for gain smoothing.
const GAIN_SMOOTH: f32 = 0.999;

/// Allowed range for each crossover point in Hz.
const CROSSOVER_RANGES: [(f32, f32); NUM_CROSSOVERS] =
    [(20.0, 500.0), (200.0, 4000.0), (2000.0, 16_000.0)];

/// Factory crossover points in Hz.
const DEFAULT_CROSSOVERS: [f32; NUM_CROSSOVERS] = [120.0, 800.0, 5000.0];

/// Serial tree of three Linkwitz-Riley 4th-order splits.
///
/// Split 0 divides the full signal at the first crossover; each later
/// split divides the remaining high branch. The crossover ranges overlap,
/// so an inverted pair (e.g. crossover 0 above crossover 1) narrows the
/// middle bands rather than failing.
#[derive(Debug, Clone)]
pub struct CrossoverNetwork {
    /// `[split][0 = lowpass pair, 1 = highpass pair]`
    filters: [[[BiquadDf1; 2]; 2]; NUM_CROSSOVERS],
    frequencies: [f32; NUM_CROSSOVERS],
    sample_rate: f32,
}

impl CrossoverNetwork {
    /// Creates the network with factory crossover points.
    pub fn new(sample_rate: f32) -> Self {
        let mut network = Self {
            filters: [[[BiquadDf1::new(sample_rate); 2]; 2]; NUM_CROSSOVERS],
            frequencies: DEFAULT_CROSSOVERS,
            sample_rate,
        };
        for split in 0..NUM_CROSSOVERS {
            network.design_split(split);
        }
        network
    }

    /// Sets one crossover point in Hz, clamped to its allowed range.
    pub fn set_frequency(&mut self, split: usize, freq_hz: f32) {
        if split >= NUM_CROSSOVERS {
            return;
        }
        let (min, max) = CROSSOVER_RANGES[split];
        self.frequencies[split] = freq_hz.clamp(min, max);
        self.design_split(split);
    }

    /// Current crossover point in Hz, or 0 for an invalid index.
    pub fn frequency(&self, split: usize) -> f32 {
        self.frequencies.get(split).copied().unwrap_or(0.0)
    }

    /// Splits one sample into `[low, low-mid, high-mid, high]`.
    #[inline]
    pub fn process(&mut self, input: f32) -> [f32; NUM_BANDS] {
        let (low, rest) = self.run_split(0, input);
        let (low_mid, rest) = self.run_split(1, rest);
        let (high_mid, high) = self.run_split(2, rest);
        [low, low_mid, high_mid, high]
    }

    #[inline]
    fn run_split(&mut self, split: usize, input: f32) -> (f32, f32) {
        let [lp, hp] = &mut self.filters[split];
        let low_stage = lp[0].process(input);
        let low = lp[1].process(low_stage);
        let high_stage = hp[0].process(input);
        let high = hp[1].process(high_stage);
        (low, high)
    }

    /// Zeroes all filter state, keeping the crossover points.
    pub fn reset(&mut self) {
        for split in &mut self.filters {
            for branch in split {
                for filter in branch {
                    filter.reset();
                }
            }
        }
    }

    /// Re-designs every split at the new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for split in &mut self.filters {
            for branch in split {
                for filter in branch {
                    filter.set_sample_rate(sample_rate);
                }
            }
        }
        for split in 0..NUM_CROSSOVERS {
            self.design_split(split);
        }
    }

    fn design_split(&mut self, split: usize) {
        let freq = self.frequencies[split];
        let [lp, hp] = &mut self.filters[split];
        for filter in lp {
            filter.set_lowpass(freq, BUTTERWORTH_Q);
        }
        for filter in hp {
            filter.set_highpass(freq, BUTTERWORTH_Q);
        }
    }
}

/// Downward compressor for one frequency band.
///
/// Detection runs on an asymmetric envelope follower; above threshold the
/// gain target follows
/// `reduction_db = 20·log10(env / threshold) · (1 - 1/ratio)` and the
/// applied gain approaches it through a fixed one-pole smoother. Metering
/// taps the raw input (peak, decay 0.9995) and the smoothed gain
/// (worst-case reduction with read-and-re-arm semantics).
///
/// Muting zeroes the output but keeps feeding the input meter, so a muted
/// band still shows its level.
#[derive(Debug, Clone)]
pub struct BandCompressor {
    envelope: EnvelopeFollower,
    threshold_db: f32,
    threshold_linear: f32,
    ratio: f32,
    makeup_db: f32,
    makeup_linear: f32,
    gain: f32,
    muted: bool,
    input_meter: PeakMeter,
    reduction_meter: GainReductionMeter,
}

impl BandCompressor {
    /// Creates a band compressor with -18 dB threshold and 4:1 ratio.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            envelope: EnvelopeFollower::with_times(sample_rate, 10.0, 100.0),
            threshold_db: -18.0,
            threshold_linear: db_to_linear(-18.0),
            ratio: 4.0,
            makeup_db: 0.0,
            makeup_linear: 1.0,
            gain: 1.0,
            muted: false,
            input_meter: PeakMeter::new(),
            reduction_meter: GainReductionMeter::new(),
        }
    }

    /// Set threshold in dB (-60 to 0).
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.threshold_db = threshold_db.clamp(-60.0, 0.0);
        self.threshold_linear = db_to_linear(self.threshold_db);
    }

    /// Current threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Set compression ratio (1-20).
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.clamp(1.0, 20.0);
    }

    /// Current compression ratio.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Set attack time in milliseconds (0.1-100).
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.envelope.set_attack_ms(attack_ms.clamp(0.1, 100.0));
    }

    /// Current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.envelope.attack_ms()
    }

    /// Set release time in milliseconds (10-1000).
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.envelope.set_release_ms(release_ms.clamp(10.0, 1000.0));
    }

    /// Current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.envelope.release_ms()
    }

    /// Set makeup gain in dB (-12 to 12).
    pub fn set_makeup_db(&mut self, makeup_db: f32) {
        self.makeup_db = makeup_db.clamp(-12.0, 12.0);
        self.makeup_linear = db_to_linear(self.makeup_db);
    }

    /// Current makeup gain in dB.
    pub fn makeup_db(&self) -> f32 {
        self.makeup_db
    }

    /// Mute or unmute this band.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Whether this band is muted.
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Held input peak level (linear).
    pub fn input_peak(&self) -> f32 {
        self.input_meter.peek()
    }

    /// Worst smoothed gain since the last drain, without re-arming.
    pub fn gain_reduction(&self) -> f32 {
        self.reduction_meter.peek()
    }

    /// Reports the worst smoothed gain since the last call, then re-arms
    /// at the current gain.
    pub fn drain_gain_reduction(&mut self) -> f32 {
        self.reduction_meter.drain()
    }

    /// Processes one sample of this band's signal.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.input_meter.process(input);
        if self.muted {
            return 0.0;
        }

        let env = self.envelope.process(input);
        let target = if env > self.threshold_linear {
            let reduction_db = linear_to_db(env / self.threshold_linear) * (1.0 - 1.0 / self.ratio);
            db_to_linear(-reduction_db)
        } else {
            1.0
        };

        self.gain = self.gain * GAIN_SMOOTH + target * (1.0 - GAIN_SMOOTH);
        self.reduction_meter.update(self.gain);

        input * self.gain * self.makeup_linear
    }

    /// Updates detector timing for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.envelope.set_sample_rate(sample_rate);
    }

    /// Clears detector state, smoothed gain, and meters. Settings stay.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.gain = 1.0;
        self.input_meter.reset();
        self.reduction_meter.reset();
    }
}

/// Four-band compressor: crossover tree, per-band dynamics, solo/mute bus.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// Band parameters repeat per band at `band · 7 + offset`, bands ordered
/// low, low-mid, high-mid, high:
///
/// | Offset | Name | Range | Default |
/// |--------|------|-------|---------|
/// | 0 | Threshold | -60–0 dB | -18.0 |
/// | 1 | Ratio | 1–20 | 4.0 |
/// | 2 | Attack | 0.1–100 ms | 10.0 |
/// | 3 | Release | 10–1000 ms | 100.0 |
/// | 4 | Makeup | -12–12 dB | 0.0 |
/// | 5 | Mute | Off/On | Off |
/// | 6 | Solo | Off/On | Off |
///
/// Crossover points follow at indices 28-30:
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 28 | Crossover 1 | 20–500 Hz | 120.0 |
/// | 29 | Crossover 2 | 200–4000 Hz | 800.0 |
/// | 30 | Crossover 3 | 2000–16000 Hz | 5000.0 |
///
/// # Example
///
/// ```rust
/// use pedalera_effects::MultibandCompressor;
/// use pedalera_core::Effect;
///
/// let mut comp = MultibandCompressor::new(48000.0);
/// comp.band_mut(0).set_threshold_db(-24.0);
/// comp.band_mut(0).set_ratio(6.0);
/// comp.set_crossover_freq(0, 150.0);
///
/// let output = comp.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct MultibandCompressor {
    crossover: CrossoverNetwork,
    bands: [BandCompressor; NUM_BANDS],
    solo: [bool; NUM_BANDS],
}

impl MultibandCompressor {
    /// Creates a multiband compressor with factory settings.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            crossover: CrossoverNetwork::new(sample_rate),
            bands: array::from_fn(|_| BandCompressor::new(sample_rate)),
            solo: [false; NUM_BANDS],
        }
    }

    /// Immutable access to one band, panicking on an invalid index.
    pub fn band(&self, index: usize) -> &BandCompressor {
        &self.bands[index]
    }

    /// Mutable access to one band, panicking on an invalid index.
    pub fn band_mut(&mut self, index: usize) -> &mut BandCompressor {
        &mut self.bands[index]
    }

    /// Set one crossover point in Hz (clamped per split).
    pub fn set_crossover_freq(&mut self, split: usize, freq_hz: f32) {
        self.crossover.set_frequency(split, freq_hz);
    }

    /// Current crossover point in Hz.
    pub fn crossover_freq(&self, split: usize) -> f32 {
        self.crossover.frequency(split)
    }

    /// Solo or unsolo one band.
    ///
    /// While any band is soloed, only soloed bands reach the output sum;
    /// the others keep processing (and metering) silently.
    pub fn set_band_solo(&mut self, index: usize, solo: bool) {
        if index < NUM_BANDS {
            self.solo[index] = solo;
        }
    }

    /// Whether one band is soloed.
    pub fn band_solo(&self, index: usize) -> bool {
        self.solo.get(index).copied().unwrap_or(false)
    }

    /// Held input peak per band, low to high.
    pub fn input_peaks(&self) -> [f32; NUM_BANDS] {
        array::from_fn(|i| self.bands[i].input_peak())
    }

    /// Worst smoothed gain per band since the last drain, low to high.
    pub fn drain_gain_reductions(&mut self) -> [f32; NUM_BANDS] {
        array::from_fn(|i| self.bands[i].drain_gain_reduction())
    }
}

impl Effect for MultibandCompressor {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let split = self.crossover.process(input);
        let any_solo = self.solo.iter().any(|&s| s);

        let mut sum = 0.0;
        for (i, band) in self.bands.iter_mut().enumerate() {
            // Every band always processes so detectors and meters stay
            // live; solo only gates the summing.
            let out = band.process(split[i]);
            if !any_solo || self.solo[i] {
                sum += out;
            }
        }
        sum
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.crossover.set_sample_rate(sample_rate);
        for band in &mut self.bands {
            band.set_sample_rate(sample_rate);
        }
    }

    fn reset(&mut self) {
        self.crossover.reset();
        for band in &mut self.bands {
            band.reset();
        }
    }
}

/// `(name, short_name)` per band parameter; `ParamDescriptor` needs
/// `'static` strings, so the band prefix is baked in.
const PARAM_NAMES: [[(&str, &str); PARAMS_PER_BAND]; NUM_BANDS] = [
    [
        ("Low Threshold", "LoThr"),
        ("Low Ratio", "LoRat"),
        ("Low Attack", "LoAtk"),
        ("Low Release", "LoRel"),
        ("Low Makeup", "LoMk"),
        ("Low Mute", "LoMut"),
        ("Low Solo", "LoSol"),
    ],
    [
        ("Low Mid Threshold", "LMThr"),
        ("Low Mid Ratio", "LMRat"),
        ("Low Mid Attack", "LMAtk"),
        ("Low Mid Release", "LMRel"),
        ("Low Mid Makeup", "LMMk"),
        ("Low Mid Mute", "LMMut"),
        ("Low Mid Solo", "LMSol"),
    ],
    [
        ("High Mid Threshold", "HMThr"),
        ("High Mid Ratio", "HMRat"),
        ("High Mid Attack", "HMAtk"),
        ("High Mid Release", "HMRel"),
        ("High Mid Makeup", "HMMk"),
        ("High Mid Mute", "HMMut"),
        ("High Mid Solo", "HMSol"),
    ],
    [
        ("High Threshold", "HiThr"),
        ("High Ratio", "HiRat"),
        ("High Attack", "HiAtk"),
        ("High Release", "HiRel"),
        ("High Makeup", "HiMk"),
        ("High Mute", "HiMut"),
        ("High Solo", "HiSol"),
    ],
];

const CROSSOVER_NAMES: [(&str, &str); NUM_CROSSOVERS] = [
    ("Crossover 1", "Xov1"),
    ("Crossover 2", "Xov2"),
    ("Crossover 3", "Xov3"),
];

impl ParameterInfo for MultibandCompressor {
    fn param_count(&self) -> usize {
        NUM_BANDS * PARAMS_PER_BAND + NUM_CROSSOVERS
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        if index < NUM_BANDS * PARAMS_PER_BAND {
            let (name, short_name) = PARAM_NAMES[index / PARAMS_PER_BAND][index % PARAMS_PER_BAND];
            let descriptor = match index % PARAMS_PER_BAND {
                0 => ParamDescriptor {
                    name,
                    short_name,
                    unit: ParamUnit::Decibels,
                    min: -60.0,
                    max: 0.0,
                    default: -18.0,
                    step: 0.5,
                },
                1 => ParamDescriptor {
                    name,
                    short_name,
                    unit: ParamUnit::Ratio,
                    min: 1.0,
                    max: 20.0,
                    default: 4.0,
                    step: 0.1,
                },
                2 => ParamDescriptor {
                    name,
                    short_name,
                    unit: ParamUnit::Milliseconds,
                    min: 0.1,
                    max: 100.0,
                    default: 10.0,
                    step: 0.1,
                },
                3 => ParamDescriptor {
                    name,
                    short_name,
                    unit: ParamUnit::Milliseconds,
                    min: 10.0,
                    max: 1000.0,
                    default: 100.0,
                    step: 1.0,
                },
                4 => ParamDescriptor {
                    name,
                    short_name,
                    unit: ParamUnit::Decibels,
                    min: -12.0,
                    max: 12.0,
                    default: 0.0,
                    step: 0.5,
                },
                // Mute and solo are 0/1 switches so presets carry them.
                _ => ParamDescriptor {
                    name,
                    short_name,
                    unit: ParamUnit::None,
                    min: 0.0,
                    max: 1.0,
                    default: 0.0,
                    step: 1.0,
                },
            };
            return Some(descriptor);
        }

        let split = index - NUM_BANDS * PARAMS_PER_BAND;
        if split < NUM_CROSSOVERS {
            let (name, short_name) = CROSSOVER_NAMES[split];
            let (min, max) = CROSSOVER_RANGES[split];
            return Some(ParamDescriptor {
                name,
                short_name,
                unit: ParamUnit::Hertz,
                min,
                max,
                default: DEFAULT_CROSSOVERS[split],
                step: 1.0,
            });
        }
        None
    }

    fn get_param(&self, index: usize) -> f32 {
        if index < NUM_BANDS * PARAMS_PER_BAND {
            let band = &self.bands[index / PARAMS_PER_BAND];
            return match index % PARAMS_PER_BAND {
                0 => band.threshold_db(),
                1 => band.ratio(),
                2 => band.attack_ms(),
                3 => band.release_ms(),
                4 => band.makeup_db(),
                5 => {
                    if band.muted() {
                        1.0
                    } else {
                        0.0
                    }
                }
                _ => {
                    if self.solo[index / PARAMS_PER_BAND] {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
        }

        let split = index - NUM_BANDS * PARAMS_PER_BAND;
        if split < NUM_CROSSOVERS {
            return self.crossover.frequency(split);
        }
        0.0
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index < NUM_BANDS * PARAMS_PER_BAND {
            let band_index = index / PARAMS_PER_BAND;
            match index % PARAMS_PER_BAND {
                0 => self.bands[band_index].set_threshold_db(value),
                1 => self.bands[band_index].set_ratio(value),
                2 => self.bands[band_index].set_attack_ms(value),
                3 => self.bands[band_index].set_release_ms(value),
                4 => self.bands[band_index].set_makeup_db(value),
                5 => self.bands[band_index].set_muted(value >= 0.5),
                _ => self.solo[band_index] = value >= 0.5,
            }
            return;
        }

        let split = index - NUM_BANDS * PARAMS_PER_BAND;
        if split < NUM_CROSSOVERS {
            self.crossover.set_frequency(split, value);
        }
    }
}
