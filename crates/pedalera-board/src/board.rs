//! The pedalboard: gain staging, metering, and live chain reconfiguration.
//!
//! Signal flow per sample:
//!
//! ```text
//! in → input gain → input meter → {dry path, wet path through units}
//!                                                          │ blend
//!           out ← visual tap ← output gain ← output meter ←┘
//! ```
//!
//! The wet path runs on one of two [`ChainBus`]es. Structural changes
//! (add/remove/reorder/preset import) rebuild the inactive bus from the
//! captured unit settings and crossfade to it over a fixed 15 ms linear
//! ramp, so a topology swap is never audible as a click. Non-structural
//! changes (enable toggles, parameter updates) apply to the live
//! instances on both buses and never rebuild anything.

use pedalera_config::{EffectEntry, PresetDocument};
use pedalera_core::{ChannelMeter, LinearSmoothedParam, SmoothedParam};
use pedalera_registry::EffectRegistry;
use tracing::{debug, warn};

use crate::bus::{ChainBus, EffectUnit, UnitId};
use crate::error::BoardError;
use crate::visual::{DEFAULT_VISUAL_WINDOW, VisualSnapshot, VisualTap};

/// Length of the bus-swap ramp.
const CROSSFADE_MS: f32 = 15.0;

/// Smoothing time for the input/output gain stages.
const GAIN_SMOOTH_MS: f32 = 10.0;

/// Smoothing time for the global bypass blend.
const BYPASS_FADE_MS: f32 = 10.0;

/// Linear gain bounds for the input and output stages.
const MIN_GAIN: f32 = 0.0;
const MAX_GAIN: f32 = 4.0;

/// Minimum spacing between externally visible level updates.
const LEVEL_INTERVAL_MS: f32 = 100.0;

/// Input and output levels reported by [`Pedalboard::levels`].
///
/// Peaks are worst-case since the previous query; RMS values are the
/// meters' running estimates at query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSnapshot {
    /// Peak level after the input gain stage.
    pub input_peak: f32,
    /// RMS level after the input gain stage.
    pub input_rms: f32,
    /// Peak level at the chain merge, before the output gain stage.
    pub output_peak: f32,
    /// RMS level at the chain merge, before the output gain stage.
    pub output_rms: f32,
}

/// Captured settings for one unit, used to rebuild a bus.
#[derive(Debug, Clone)]
struct UnitSpec {
    id: UnitId,
    effect_type: &'static str,
    enabled: bool,
    /// Parameter values in index order; empty means effect defaults.
    params: Vec<f32>,
}

/// A live effect chain with glitch-free reconfiguration.
///
/// Every board is an independent handle: it owns its effect registry,
/// both chain buses, the gain stages, and the meters. Audio flows
/// through [`process`](Self::process) /
/// [`process_block`](Self::process_block), which allocate nothing and
/// take no locks; structural changes happen on the caller's control
/// thread and reach the audio path only through the crossfade blend.
///
/// # Example
///
/// ```rust
/// use pedalera_board::Pedalboard;
///
/// let mut board = Pedalboard::new(48000.0);
/// let echo = board.add_effect("echo").unwrap();
/// board.update_param(echo, "Mix", 40.0);
///
/// let input = [0.1, 0.2, 0.3, 0.4];
/// let mut output = [0.0; 4];
/// board.process_block(&input, &mut output);
/// ```
pub struct Pedalboard {
    sample_rate: f32,
    registry: EffectRegistry,
    /// The two chain buses; `active` indexes the one carrying authority.
    buses: [ChainBus; 2],
    active: usize,
    /// True while a bus swap is ramping.
    fading: bool,
    /// Blend from the outgoing bus (0.0) to the incoming one (1.0).
    crossfade: LinearSmoothedParam,
    input_gain: SmoothedParam,
    output_gain: SmoothedParam,
    global_bypass: bool,
    /// Blend from dry (0.0) to the wet chain (1.0).
    bypass_fade: SmoothedParam,
    input_meter: ChannelMeter,
    output_meter: ChannelMeter,
    visual: VisualTap,
    /// Samples processed since construction or the last reset.
    clock: u64,
    last_level_clock: Option<u64>,
    level_interval: u64,
}

impl Pedalboard {
    /// Creates an empty board with the default visualization window.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_visual_window(sample_rate, DEFAULT_VISUAL_WINDOW)
    }

    /// Creates an empty board with a caller-chosen visualization window.
    ///
    /// The window is clamped to a sane range; see
    /// [`visual_window`](Self::visual_window) for the value in effect.
    pub fn with_visual_window(sample_rate: f32, window: usize) -> Self {
        let sample_rate = sample_rate.clamp(8000.0, 384_000.0);
        Self {
            sample_rate,
            registry: EffectRegistry::new(),
            buses: [ChainBus::new(), ChainBus::new()],
            active: 0,
            fading: false,
            crossfade: LinearSmoothedParam::with_config(0.0, sample_rate, CROSSFADE_MS),
            input_gain: SmoothedParam::with_config(1.0, sample_rate, GAIN_SMOOTH_MS),
            output_gain: SmoothedParam::with_config(1.0, sample_rate, GAIN_SMOOTH_MS),
            global_bypass: false,
            bypass_fade: SmoothedParam::with_config(1.0, sample_rate, BYPASS_FADE_MS),
            input_meter: ChannelMeter::new(sample_rate),
            output_meter: ChannelMeter::new(sample_rate),
            visual: VisualTap::new(window),
            clock: 0,
            last_level_clock: None,
            level_interval: level_interval_samples(sample_rate),
        }
    }

    /// The sample rate the board runs at.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of units in the current chain.
    pub fn len(&self) -> usize {
        self.buses[self.topology_bus()].len()
    }

    /// True when the chain has no units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The units of the current chain, in processing order.
    pub fn units(&self) -> &[EffectUnit] {
        self.buses[self.topology_bus()].units()
    }

    /// Type ids of the current chain, in processing order.
    pub fn effect_types(&self) -> Vec<&'static str> {
        self.units().iter().map(EffectUnit::effect_type).collect()
    }

    /// Unit ids of the current chain, in processing order.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units().iter().map(EffectUnit::id).collect()
    }

    /// True while a structural crossfade is ramping.
    pub fn is_crossfading(&self) -> bool {
        self.fading
    }

    // -----------------------------------------------------------------------
    // Structural operations
    // -----------------------------------------------------------------------

    /// Appends a new unit of the given registry type to the chain.
    ///
    /// Returns the new unit's id, or `None` when the type is unknown.
    /// The change reaches the audio path through a 15 ms crossfade.
    pub fn add_effect(&mut self, type_name: &str) -> Option<UnitId> {
        self.finish_settled_crossfade();

        let type_id = match self.registry.get(type_name) {
            Some(descriptor) => descriptor.id,
            None => {
                debug!("add_effect: unknown effect type '{type_name}'");
                return None;
            }
        };

        let id = UnitId::next();
        let mut specs = self.capture_topology();
        specs.push(UnitSpec {
            id,
            effect_type: type_id,
            enabled: true,
            params: Vec::new(),
        });
        self.rebuild_pending(&specs);
        self.begin_crossfade();
        debug!("add_effect: '{type_id}' as unit {}", id.raw());
        Some(id)
    }

    /// Removes the unit with the given id. Unknown ids are a no-op.
    pub fn remove_effect(&mut self, id: UnitId) {
        self.finish_settled_crossfade();

        let mut specs = self.capture_topology();
        let before = specs.len();
        specs.retain(|spec| spec.id != id);
        if specs.len() == before {
            debug!("remove_effect: no unit {}", id.raw());
            return;
        }

        self.rebuild_pending(&specs);
        self.begin_crossfade();
        debug!("remove_effect: unit {}", id.raw());
    }

    /// Rearranges the chain into the given order.
    ///
    /// The order must be a permutation of exactly the current unit ids;
    /// anything else is rejected with the chain unchanged.
    pub fn reorder_effects(&mut self, order: &[UnitId]) -> Result<(), BoardError> {
        self.finish_settled_crossfade();

        let specs = self.capture_topology();
        let matches = order.len() == specs.len()
            && specs.iter().all(|spec| order.contains(&spec.id))
            && order.iter().all(|id| specs.iter().any(|spec| spec.id == *id));
        if !matches {
            return Err(BoardError::InvalidReorder);
        }

        let reordered: Vec<UnitSpec> = order
            .iter()
            .filter_map(|id| specs.iter().find(|spec| spec.id == *id).cloned())
            .collect();
        self.rebuild_pending(&reordered);
        self.begin_crossfade();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Non-structural operations
    // -----------------------------------------------------------------------

    /// Moves a unit in or out of the wet path. Unknown ids are a no-op.
    ///
    /// Applies to the live instances on both buses; no rebuild, the
    /// unit's own 10 ms blend covers the transition.
    pub fn set_effect_enabled(&mut self, id: UnitId, enabled: bool) {
        let mut found = false;
        for bus in &mut self.buses {
            if let Some(unit) = bus.find_mut(id) {
                unit.set_enabled(enabled);
                found = true;
            }
        }
        if !found {
            debug!("set_effect_enabled: no unit {}", id.raw());
        }
    }

    /// Sets one named parameter on a unit, clamped to its documented
    /// range. Unknown ids and unknown names are a no-op.
    pub fn update_param(&mut self, id: UnitId, name: &str, value: f32) {
        let mut applied = false;
        for bus in &mut self.buses {
            if let Some(unit) = bus.find_mut(id)
                && let Some(index) = unit.find_param(name)
            {
                unit.set_param(index, value);
                applied = true;
            }
        }
        if !applied {
            debug!("update_param: no unit {} with param '{name}'", id.raw());
        }
    }

    // -----------------------------------------------------------------------
    // Gain staging and bypass
    // -----------------------------------------------------------------------

    /// Sets the linear input gain, clamped to `[0, 4]` and smoothed.
    pub fn set_input_gain(&mut self, gain: f32) {
        self.input_gain.set_target(gain.clamp(MIN_GAIN, MAX_GAIN));
    }

    /// The input gain target.
    pub fn input_gain(&self) -> f32 {
        self.input_gain.target()
    }

    /// Sets the linear output gain, clamped to `[0, 4]` and smoothed.
    pub fn set_output_gain(&mut self, gain: f32) {
        self.output_gain.set_target(gain.clamp(MIN_GAIN, MAX_GAIN));
    }

    /// The output gain target.
    pub fn output_gain(&self) -> f32 {
        self.output_gain.target()
    }

    /// Routes the signal around the whole chain (true) or through it
    /// (false), crossfading either way.
    pub fn set_global_bypass(&mut self, bypassed: bool) {
        self.global_bypass = bypassed;
        self.bypass_fade.set_target(if bypassed { 0.0 } else { 1.0 });
    }

    /// Whether the chain is globally bypassed.
    pub fn global_bypass(&self) -> bool {
        self.global_bypass
    }

    // -----------------------------------------------------------------------
    // Audio path
    // -----------------------------------------------------------------------

    /// Processes one sample. Allocation-free and lock-free.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let in_gain = self.input_gain.advance();
        let x = input * in_gain;
        self.input_meter.process(x);

        let fade = self.bypass_fade.advance();
        let out = if fade < 1e-6 {
            // Fully bypassed: skip the chain, but keep any bus swap
            // moving so it completes on schedule.
            self.tick_crossfade_idle();
            x
        } else {
            let wet = self.process_buses(x);
            if (fade - 1.0).abs() < 1e-6 {
                wet
            } else {
                x * (1.0 - fade) + wet * fade
            }
        };

        self.output_meter.process(out);
        let out_gain = self.output_gain.advance();
        let y = out * out_gain;
        self.visual.push(y);
        self.clock += 1;
        y
    }

    /// Processes a block. Output must be at least as large as input.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert!(output.len() >= input.len());

        for (x, y) in input.iter().zip(output.iter_mut()) {
            *y = self.process(*x);
        }
    }

    /// Processes a stereo block by mono-summing the input and fanning
    /// the processed signal out to both channels.
    pub fn process_block_stereo(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        debug_assert_eq!(left_in.len(), right_in.len());
        debug_assert!(left_out.len() >= left_in.len());
        debug_assert!(right_out.len() >= right_in.len());

        for i in 0..left_in.len() {
            let mono = (left_in[i] + right_in[i]) * 0.5;
            let y = self.process(mono);
            left_out[i] = y;
            right_out[i] = y;
        }
    }

    /// Updates the sample rate for every stage on the board.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let sample_rate = sample_rate.clamp(8000.0, 384_000.0);
        self.sample_rate = sample_rate;
        for bus in &mut self.buses {
            bus.set_sample_rate(sample_rate);
        }
        self.crossfade.set_sample_rate(sample_rate);
        self.input_gain.set_sample_rate(sample_rate);
        self.output_gain.set_sample_rate(sample_rate);
        self.bypass_fade.set_sample_rate(sample_rate);
        self.input_meter.set_sample_rate(sample_rate);
        self.output_meter.set_sample_rate(sample_rate);
        self.level_interval = level_interval_samples(sample_rate);
    }

    /// Clears all audio state: effect tails, meters, the visual tap,
    /// and the sample clock. Settings and topology are kept; a pending
    /// bus swap completes immediately.
    pub fn reset(&mut self) {
        if self.fading {
            self.crossfade.snap_to_target();
            self.flip_active();
        }
        for bus in &mut self.buses {
            bus.reset();
        }
        self.input_meter.reset();
        self.output_meter.reset();
        self.visual.clear();
        self.clock = 0;
        self.last_level_clock = None;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Input/output levels, throttled to one visible update per 100 ms
    /// of processed audio. Returns `None` inside the throttle window and
    /// before the first processed sample.
    pub fn levels(&mut self) -> Option<LevelSnapshot> {
        if self.clock == 0 {
            return None;
        }
        if let Some(last) = self.last_level_clock
            && self.clock - last < self.level_interval
        {
            return None;
        }

        self.last_level_clock = Some(self.clock);
        Some(LevelSnapshot {
            input_peak: self.input_meter.drain_peak(),
            input_rms: self.input_meter.rms(),
            output_peak: self.output_meter.drain_peak(),
            output_rms: self.output_meter.rms(),
        })
    }

    /// The visualization window length in samples.
    pub fn visual_window(&self) -> usize {
        self.visual.size()
    }

    /// Waveform and spectrum of the most recent output.
    ///
    /// Control-plane query; allocates the returned buffers. Both vectors
    /// are empty before the first processed sample.
    pub fn visual_snapshot(&self) -> VisualSnapshot {
        if self.clock == 0 {
            return VisualSnapshot::default();
        }
        self.visual.snapshot()
    }

    // -----------------------------------------------------------------------
    // Preset glue
    // -----------------------------------------------------------------------

    /// Serializes the current chain and gain staging.
    ///
    /// Parameter values are recorded under their display names, in
    /// descriptor units.
    pub fn export_preset(&self) -> PresetDocument {
        let mut doc = PresetDocument::new()
            .with_input_gain(self.input_gain.target())
            .with_output_gain(self.output_gain.target());

        for unit in self.units() {
            let mut entry = EffectEntry::new(unit.effect_type()).with_enabled(unit.is_enabled());
            for index in 0..unit.param_count() {
                if let Some(info) = unit.param_info(index) {
                    entry = entry.with_param(info.name, unit.param_value(index));
                }
            }
            doc = doc.with_effect(entry);
        }
        doc
    }

    /// Replaces the whole chain from a preset document.
    ///
    /// Effect types missing from the registry are skipped with a log
    /// line; everything else lands on the inactive bus and crossfades in
    /// like any other structural change.
    pub fn import_preset(&mut self, preset: &PresetDocument) {
        self.finish_settled_crossfade();

        self.set_input_gain(preset.input_gain);
        self.set_output_gain(preset.output_gain);

        let pending = 1 - self.active;
        self.buses[pending].clear();
        for entry in &preset.effects {
            let type_id = match self.registry.get(&entry.effect_type) {
                Some(descriptor) => descriptor.id,
                None => {
                    warn!(
                        "import_preset: skipping unknown effect type '{}'",
                        entry.effect_type
                    );
                    continue;
                }
            };
            let Some(mut effect) = self.registry.create(type_id, self.sample_rate) else {
                continue;
            };
            for (name, &value) in &entry.params {
                if let Some(index) = effect.effect_find_param(name) {
                    effect.effect_set_param(index, value);
                } else {
                    debug!("import_preset: '{type_id}' has no param '{name}'");
                }
            }
            effect.reset();
            self.buses[pending].push(EffectUnit::new(
                UnitId::next(),
                type_id,
                entry.enabled,
                effect,
                self.sample_rate,
            ));
        }
        self.begin_crossfade();
        debug!("import_preset: {} units", self.buses[1 - self.active].len());
    }

    /// Parses and imports a JSON preset.
    ///
    /// Malformed JSON and unsupported versions leave the board unchanged
    /// beyond a log line.
    pub fn import_preset_json(&mut self, json: &str) {
        match PresetDocument::from_json(json) {
            Ok(preset) => self.import_preset(&preset),
            Err(err) => warn!("import_preset_json: rejected ({err}), board unchanged"),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Index of the bus holding the current logical topology.
    fn topology_bus(&self) -> usize {
        if self.fading { 1 - self.active } else { self.active }
    }

    fn capture_topology(&self) -> Vec<UnitSpec> {
        self.buses[self.topology_bus()]
            .units()
            .iter()
            .map(|unit| UnitSpec {
                id: unit.id(),
                effect_type: unit.effect_type(),
                enabled: unit.is_enabled(),
                params: (0..unit.param_count()).map(|i| unit.param_value(i)).collect(),
            })
            .collect()
    }

    /// Rebuilds the inactive bus with fresh instances. DSP state does
    /// not carry over; captured parameter values do.
    fn rebuild_pending(&mut self, specs: &[UnitSpec]) {
        let pending = 1 - self.active;
        self.buses[pending].clear();
        for spec in specs {
            let Some(mut effect) = self.registry.create(spec.effect_type, self.sample_rate) else {
                warn!("rebuild: effect type '{}' vanished from registry", spec.effect_type);
                continue;
            };
            for (index, &value) in spec.params.iter().enumerate() {
                effect.effect_set_param(index, value);
            }
            // Snap the smoothed params so the captured settings are in
            // effect from the first sample instead of gliding in from
            // the defaults.
            effect.reset();
            self.buses[pending].push(EffectUnit::new(
                spec.id,
                spec.effect_type,
                spec.enabled,
                effect,
                self.sample_rate,
            ));
        }
    }

    /// Starts (or restarts from the current blend) the ramp towards the
    /// pending bus.
    fn begin_crossfade(&mut self) {
        let from = if self.fading { self.crossfade.get() } else { 0.0 };
        self.crossfade.set_immediate(from);
        self.crossfade.set_target(1.0);
        self.fading = true;
    }

    /// Control-plane check run before structural ops: if a fade has
    /// landed but no audio has run since, complete the flip here.
    fn finish_settled_crossfade(&mut self) {
        if self.fading && self.crossfade.is_settled() {
            self.flip_active();
        }
    }

    /// Makes the pending bus active. The outgoing bus keeps its boxed
    /// units until the next rebuild; dropping them here would hit the
    /// allocator on the audio path.
    fn flip_active(&mut self) {
        self.active = 1 - self.active;
        self.fading = false;
    }

    /// Advances a pending swap without processing the buses (global
    /// bypass skips them entirely).
    fn tick_crossfade_idle(&mut self) {
        if self.fading {
            self.crossfade.advance();
            if self.crossfade.is_settled() {
                self.flip_active();
            }
        }
    }

    /// Runs the wet path: one bus in steady state, both mixed by the
    /// ramp during a swap.
    #[inline]
    fn process_buses(&mut self, x: f32) -> f32 {
        if !self.fading {
            return self.buses[self.active].process(x);
        }

        let blend = self.crossfade.advance();
        let old_out = self.buses[self.active].process(x);
        let new_out = self.buses[1 - self.active].process(x);
        let y = old_out * (1.0 - blend) + new_out * blend;
        if self.crossfade.is_settled() {
            self.flip_active();
        }
        y
    }
}

impl std::fmt::Debug for Pedalboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pedalboard")
            .field("sample_rate", &self.sample_rate)
            .field("units", &self.len())
            .field("active", &self.active)
            .field("fading", &self.fading)
            .field("global_bypass", &self.global_bypass)
            .finish_non_exhaustive()
    }
}

fn level_interval_samples(sample_rate: f32) -> u64 {
    ((sample_rate * LEVEL_INTERVAL_MS / 1000.0) as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;
    /// Crossfade length in samples at `SR`.
    const FADE_SAMPLES: usize = 720;

    fn run(board: &mut Pedalboard, input: f32, samples: usize) -> f32 {
        let mut last = 0.0;
        for _ in 0..samples {
            last = board.process(input);
        }
        last
    }

    #[test]
    fn test_empty_board_passes_through() {
        let mut board = Pedalboard::new(SR);
        assert!(board.is_empty());
        assert_eq!(board.process(0.5), 0.5);

        let input = [0.1, -0.2, 0.3];
        let mut output = [0.0; 3];
        board.process_block(&input, &mut output);
        assert_eq!(output, input);
    }

    #[test]
    fn test_add_effect_returns_unique_ids() {
        let mut board = Pedalboard::new(SR);
        let a = board.add_effect("echo").expect("echo should exist");
        let b = board.add_effect("phaser").expect("phaser should exist");

        assert_ne!(a, b);
        assert_eq!(board.len(), 2);
        assert_eq!(board.effect_types(), vec!["echo", "phaser"]);
        assert_eq!(board.unit_ids(), vec![a, b]);
    }

    #[test]
    fn test_add_unknown_effect_is_none() {
        let mut board = Pedalboard::new(SR);
        assert!(board.add_effect("tape_warble").is_none());
        assert!(board.is_empty());
        assert!(!board.is_crossfading());
    }

    #[test]
    fn test_remove_effect() {
        let mut board = Pedalboard::new(SR);
        let echo = board.add_effect("echo").unwrap();
        board.add_effect("flanger").unwrap();

        board.remove_effect(echo);
        assert_eq!(board.len(), 1);
        assert_eq!(board.effect_types(), vec!["flanger"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut board = Pedalboard::new(SR);
        let echo = board.add_effect("echo").unwrap();
        board.remove_effect(echo);

        // The id is gone now; removing it again changes nothing.
        board.remove_effect(echo);
        assert_eq!(board.len(), 0);
    }

    #[test]
    fn test_reorder_effects() {
        let mut board = Pedalboard::new(SR);
        let a = board.add_effect("echo").unwrap();
        let b = board.add_effect("flanger").unwrap();
        let c = board.add_effect("phaser").unwrap();

        board.reorder_effects(&[c, a, b]).expect("valid permutation");
        assert_eq!(board.effect_types(), vec!["phaser", "echo", "flanger"]);
        assert_eq!(board.unit_ids(), vec![c, a, b]);
    }

    #[test]
    fn test_reorder_rejects_bad_permutations() {
        let mut board = Pedalboard::new(SR);
        let a = board.add_effect("echo").unwrap();
        let b = board.add_effect("flanger").unwrap();
        let stale = UnitId::next();

        assert_eq!(board.reorder_effects(&[a]), Err(BoardError::InvalidReorder));
        assert_eq!(
            board.reorder_effects(&[a, b, stale]),
            Err(BoardError::InvalidReorder)
        );
        assert_eq!(
            board.reorder_effects(&[a, stale]),
            Err(BoardError::InvalidReorder)
        );
        assert_eq!(
            board.reorder_effects(&[a, a]),
            Err(BoardError::InvalidReorder)
        );

        // Untouched by the rejected requests
        assert_eq!(board.unit_ids(), vec![a, b]);
    }

    #[test]
    fn test_crossfade_runs_its_window_then_flips() {
        let mut board = Pedalboard::new(SR);
        board.add_effect("echo").unwrap();
        assert!(board.is_crossfading());

        run(&mut board, 0.1, FADE_SAMPLES - 1);
        assert!(board.is_crossfading());

        run(&mut board, 0.1, 2);
        assert!(!board.is_crossfading());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_structural_change_during_fade_restarts_ramp() {
        let mut board = Pedalboard::new(SR);
        board.add_effect("echo").unwrap();
        run(&mut board, 0.1, 300);
        assert!(board.is_crossfading());

        // Restarts the ramp from the current blend; the clock starts over.
        board.add_effect("phaser").unwrap();
        assert_eq!(board.len(), 2);

        run(&mut board, 0.1, FADE_SAMPLES - 20);
        assert!(board.is_crossfading(), "restarted ramp should still be running");

        run(&mut board, 0.1, 40);
        assert!(!board.is_crossfading());
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_set_effect_enabled() {
        let mut board = Pedalboard::new(SR);
        let echo = board.add_effect("echo").unwrap();

        board.set_effect_enabled(echo, false);
        assert!(!board.units()[0].is_enabled());

        board.set_effect_enabled(echo, true);
        assert!(board.units()[0].is_enabled());

        // Unknown id: no-op
        board.set_effect_enabled(UnitId::next(), false);
        assert!(board.units()[0].is_enabled());
    }

    #[test]
    fn test_update_param_applies_and_clamps() {
        let mut board = Pedalboard::new(SR);
        let echo = board.add_effect("echo").unwrap();

        board.update_param(echo, "Feedback", 60.0);
        let doc = board.export_preset();
        let feedback = doc.get(0).unwrap().param("Feedback").unwrap();
        assert!((feedback - 60.0).abs() < 1e-3, "got {feedback}");

        // Past the documented maximum: clamped, not rejected
        board.update_param(echo, "Feedback", 500.0);
        let doc = board.export_preset();
        let feedback = doc.get(0).unwrap().param("Feedback").unwrap();
        assert!((feedback - 95.0).abs() < 1e-3, "got {feedback}");

        // Unknown name and unknown id: no-ops
        board.update_param(echo, "Altitude", 1.0);
        board.update_param(UnitId::next(), "Feedback", 10.0);
    }

    #[test]
    fn test_gain_setters_clamp() {
        let mut board = Pedalboard::new(SR);
        board.set_input_gain(10.0);
        board.set_output_gain(-3.0);

        assert_eq!(board.input_gain(), 4.0);
        assert_eq!(board.output_gain(), 0.0);
    }

    #[test]
    fn test_gains_shape_the_signal() {
        let mut board = Pedalboard::new(SR);
        board.set_input_gain(2.0);
        board.set_output_gain(0.25);

        let out = run(&mut board, 0.4, 20_000);
        assert!((out - 0.2).abs() < 1e-3, "0.4 * 2.0 * 0.25, got {out}");
    }

    #[test]
    fn test_global_bypass_is_exact_passthrough_when_settled() {
        let mut board = Pedalboard::new(SR);
        board.add_effect("echo").unwrap();
        board.set_global_bypass(true);
        run(&mut board, 0.3, 10_000);

        assert!(board.global_bypass());
        assert_eq!(board.process(0.3), 0.3);

        // Coming back: the wet path blends in within a few ms
        board.set_global_bypass(false);
        let mut diverged = false;
        for _ in 0..2000 {
            if (board.process(0.3) - 0.3).abs() > 1e-3 {
                diverged = true;
                break;
            }
        }
        assert!(diverged, "wet path should alter a DC signal through an echo");
    }

    #[test]
    fn test_levels_throttle() {
        let mut board = Pedalboard::new(SR);
        assert!(board.levels().is_none(), "nothing processed yet");

        run(&mut board, 0.5, 512);
        let first = board.levels().expect("first query after audio");
        assert!((first.input_peak - 0.5).abs() < 1e-6);
        assert!(first.input_rms > 0.0 && first.input_rms <= 0.5);

        assert!(board.levels().is_none(), "inside the 100 ms window");

        run(&mut board, 0.5, 4800);
        assert!(board.levels().is_some(), "window has passed");
    }

    #[test]
    fn test_levels_peak_drains_between_queries() {
        let mut board = Pedalboard::new(SR);
        run(&mut board, 0.9, 512);
        let loud = board.levels().unwrap();
        assert!((loud.output_peak - 0.9).abs() < 1e-6);

        // Quiet stretch; the next snapshot reports the new worst case,
        // not the stale 0.9.
        run(&mut board, 0.1, 9600);
        let quiet = board.levels().unwrap();
        assert!(quiet.output_peak < 0.2, "got {}", quiet.output_peak);
    }

    #[test]
    fn test_visual_snapshot_empty_before_audio() {
        let board = Pedalboard::new(SR);
        let snap = board.visual_snapshot();
        assert!(snap.waveform.is_empty());
        assert!(snap.spectrum_db.is_empty());
    }

    #[test]
    fn test_visual_snapshot_after_audio() {
        let mut board = Pedalboard::new(SR);
        assert_eq!(board.visual_window(), 1024);

        let input: Vec<f32> = (0..2048)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / SR).sin() * 0.5)
            .collect();
        let mut output = vec![0.0; 2048];
        board.process_block(&input, &mut output);

        let snap = board.visual_snapshot();
        assert_eq!(snap.waveform.len(), 1024);
        assert_eq!(snap.spectrum_db.len(), 512);
        assert_eq!(snap.waveform[1023], output[2047]);

        // 1 kHz should dominate the spectrum: bin ≈ 1000 / (48000/1024)
        let peak_bin = snap
            .spectrum_db
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!((20..=23).contains(&peak_bin), "got bin {peak_bin}");
    }

    #[test]
    fn test_custom_visual_window() {
        let mut board = Pedalboard::with_visual_window(SR, 256);
        assert_eq!(board.visual_window(), 256);

        run(&mut board, 0.2, 300);
        let snap = board.visual_snapshot();
        assert_eq!(snap.waveform.len(), 256);
        assert_eq!(snap.spectrum_db.len(), 128);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut source = Pedalboard::new(SR);
        let echo = source.add_effect("echo").unwrap();
        source.add_effect("phaser").unwrap();
        source.update_param(echo, "Delay Time", 420.0);
        source.update_param(echo, "Feedback", 65.0);
        source.set_effect_enabled(echo, false);
        source.set_input_gain(1.5);
        source.set_output_gain(0.8);

        let doc = source.export_preset();

        let mut target = Pedalboard::new(SR);
        target.import_preset(&doc);

        assert_eq!(target.effect_types(), vec!["echo", "phaser"]);
        assert!(!target.units()[0].is_enabled());
        assert!(target.units()[1].is_enabled());
        assert_eq!(target.input_gain(), 1.5);
        assert_eq!(target.output_gain(), 0.8);

        let doc_b = target.export_preset();
        for (a, b) in doc.effects.iter().zip(doc_b.effects.iter()) {
            assert_eq!(a.effect_type, b.effect_type);
            assert_eq!(a.enabled, b.enabled);
            for (name, &value) in &a.params {
                let other = b.param(name).expect("same param set");
                assert!(
                    (value - other).abs() < 1e-3,
                    "param '{name}': {value} vs {other}"
                );
            }
        }
    }

    #[test]
    fn test_import_skips_unknown_types() {
        let mut board = Pedalboard::new(SR);
        let doc = PresetDocument::new()
            .with_effect(EffectEntry::new("granulator").with_param("Grain Size", 80.0))
            .with_effect(EffectEntry::new("echo").with_param("Mix", 30.0));

        board.import_preset(&doc);
        assert_eq!(board.effect_types(), vec!["echo"]);
    }

    #[test]
    fn test_import_preset_json_rejects_bad_payloads() {
        let mut board = Pedalboard::new(SR);
        board.add_effect("echo").unwrap();

        board.import_preset_json("{ this is not json");
        assert_eq!(board.effect_types(), vec!["echo"]);

        board.import_preset_json(r#"{"version": 2, "effects": []}"#);
        assert_eq!(board.effect_types(), vec!["echo"]);
    }

    #[test]
    fn test_import_preset_json_applies_good_payloads() {
        let mut board = Pedalboard::new(SR);
        board.import_preset_json(
            r#"{
                "version": 1,
                "inputGain": 0.9,
                "effects": [
                    { "effectType": "flanger", "params": { "Rate": 0.7 } }
                ]
            }"#,
        );

        assert_eq!(board.effect_types(), vec!["flanger"]);
        assert_eq!(board.input_gain(), 0.9);
    }

    #[test]
    fn test_set_sample_rate_propagates() {
        let mut board = Pedalboard::new(SR);
        board.add_effect("echo").unwrap();
        board.set_sample_rate(96000.0);

        assert_eq!(board.sample_rate(), 96000.0);
        let out = run(&mut board, 0.2, 2048);
        assert!(out.is_finite());
    }

    #[test]
    fn test_reset_clears_audio_state() {
        let mut board = Pedalboard::new(SR);
        board.add_effect("echo").unwrap();
        run(&mut board, 0.5, 4096);

        board.reset();
        assert!(!board.is_crossfading());
        assert!(board.levels().is_none());
        assert!(board.visual_snapshot().waveform.is_empty());
        assert_eq!(board.len(), 1, "topology survives a reset");

        let out = board.process(0.3);
        assert!(out.is_finite());
    }

    #[test]
    fn test_remove_during_fade_keeps_logical_view() {
        let mut board = Pedalboard::new(SR);
        let a = board.add_effect("echo").unwrap();
        let b = board.add_effect("flanger").unwrap();
        run(&mut board, 0.1, 100);
        assert!(board.is_crossfading());

        board.remove_effect(a);
        assert_eq!(board.unit_ids(), vec![b]);

        run(&mut board, 0.1, FADE_SAMPLES + 10);
        assert!(!board.is_crossfading());
        assert_eq!(board.unit_ids(), vec![b]);
    }
}
