//! Effect units and the serial chain bus.
//!
//! A [`ChainBus`] threads a sample through its [`EffectUnit`]s in list
//! order. The board owns two buses and crossfades between them on
//! topology changes; within a bus, each unit carries its own smoothed
//! enable blend so toggling a single pedal never clicks.

use std::sync::atomic::{AtomicU64, Ordering};

use pedalera_core::{EffectWithParams, ParamDescriptor, SmoothedParam};

/// Smoothing time for a unit's enable/disable blend.
const ENABLE_FADE_MS: f32 = 10.0;

/// Stable handle for one effect unit on the board.
///
/// Ids come from a process-wide monotonic counter and are never reused,
/// so a handle kept across a remove can never silently alias a unit
/// added later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u64);

impl UnitId {
    /// Allocates the next id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        UnitId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value, for display and logging.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One effect slot in a chain: an effect instance plus its identity and
/// enable state.
pub struct EffectUnit {
    id: UnitId,
    effect_type: &'static str,
    enabled: bool,
    enable_fade: SmoothedParam,
    effect: Box<dyn EffectWithParams + Send>,
}

impl EffectUnit {
    pub(crate) fn new(
        id: UnitId,
        effect_type: &'static str,
        enabled: bool,
        effect: Box<dyn EffectWithParams + Send>,
        sample_rate: f32,
    ) -> Self {
        let initial = if enabled { 1.0 } else { 0.0 };
        Self {
            id,
            effect_type,
            enabled,
            enable_fade: SmoothedParam::with_config(initial, sample_rate, ENABLE_FADE_MS),
            effect,
        }
    }

    /// This unit's stable id.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// The registry type id this unit was created from.
    pub fn effect_type(&self) -> &'static str {
        self.effect_type
    }

    /// Whether the unit is in the wet path.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of parameters the underlying effect exposes.
    pub fn param_count(&self) -> usize {
        self.effect.effect_param_count()
    }

    /// Descriptor for one parameter.
    pub fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.effect.effect_param_info(index)
    }

    /// Current value of one parameter in descriptor units.
    pub fn param_value(&self, index: usize) -> f32 {
        self.effect.effect_get_param(index)
    }

    /// Parameter index for a display or short name.
    pub fn find_param(&self, name: &str) -> Option<usize> {
        self.effect.effect_find_param(name)
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.enable_fade.set_target(if enabled { 1.0 } else { 0.0 });
    }

    pub(crate) fn set_param(&mut self, index: usize, value: f32) {
        self.effect.effect_set_param(index, value);
    }

    /// Process one sample through this unit's enable blend.
    ///
    /// A settled disabled unit is a pure passthrough and its effect is
    /// not run, so a long-disabled echo holds whatever tail it had.
    #[inline]
    pub(crate) fn process(&mut self, input: f32) -> f32 {
        let fade = self.enable_fade.advance();
        if fade < 1e-6 {
            return input;
        }
        let wet = self.effect.process(input);
        if (fade - 1.0).abs() < 1e-6 {
            wet
        } else {
            input * (1.0 - fade) + wet * fade
        }
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: f32) {
        self.enable_fade.set_sample_rate(sample_rate);
        self.effect.set_sample_rate(sample_rate);
    }

    pub(crate) fn reset(&mut self) {
        self.effect.reset();
        self.enable_fade.snap_to_target();
    }
}

impl std::fmt::Debug for EffectUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectUnit")
            .field("id", &self.id)
            .field("effect_type", &self.effect_type)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// One of the board's two serial chains.
#[derive(Debug, Default)]
pub(crate) struct ChainBus {
    units: Vec<EffectUnit>,
}

impl ChainBus {
    pub(crate) fn new() -> Self {
        Self { units: Vec::new() }
    }

    pub(crate) fn push(&mut self, unit: EffectUnit) {
        self.units.push(unit);
    }

    pub(crate) fn clear(&mut self) {
        self.units.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    pub(crate) fn units(&self) -> &[EffectUnit] {
        &self.units
    }

    pub(crate) fn find_mut(&mut self, id: UnitId) -> Option<&mut EffectUnit> {
        self.units.iter_mut().find(|u| u.id() == id)
    }

    /// Thread one sample through every unit in order.
    #[inline]
    pub(crate) fn process(&mut self, input: f32) -> f32 {
        let mut sample = input;
        for unit in &mut self.units {
            sample = unit.process(sample);
        }
        sample
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: f32) {
        for unit in &mut self.units {
            unit.set_sample_rate(sample_rate);
        }
    }

    pub(crate) fn reset(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedalera_core::{Effect, ParamUnit, ParameterInfo};

    // Simple test effect that multiplies by a factor
    struct Gain {
        factor: f32,
    }

    impl Effect for Gain {
        fn process(&mut self, input: f32) -> f32 {
            input * self.factor
        }

        fn set_sample_rate(&mut self, _sample_rate: f32) {}
        fn reset(&mut self) {}
    }

    impl ParameterInfo for Gain {
        fn param_count(&self) -> usize {
            1
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            (index == 0).then(|| ParamDescriptor {
                name: "Factor",
                short_name: "Fac",
                unit: ParamUnit::Ratio,
                min: 0.0,
                max: 4.0,
                default: 1.0,
                step: 0.01,
            })
        }

        fn get_param(&self, index: usize) -> f32 {
            if index == 0 { self.factor } else { 0.0 }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            if index == 0 {
                self.factor = value.clamp(0.0, 4.0);
            }
        }
    }

    fn unit(factor: f32, enabled: bool) -> EffectUnit {
        EffectUnit::new(
            UnitId::next(),
            "gain",
            enabled,
            Box::new(Gain { factor }),
            48000.0,
        )
    }

    #[test]
    fn test_unit_ids_are_unique() {
        let a = UnitId::next();
        let b = UnitId::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn test_enabled_unit_processes() {
        let mut u = unit(2.0, true);
        assert_eq!(u.process(0.5), 1.0);
    }

    #[test]
    fn test_disabled_unit_passes_through() {
        let mut u = unit(2.0, false);
        assert_eq!(u.process(0.5), 0.5);
    }

    #[test]
    fn test_enable_toggle_blends_smoothly() {
        let mut u = unit(2.0, true);
        u.set_enabled(false);

        // The first samples after the toggle sit strictly between the
        // wet (1.0) and dry (0.5) values.
        let first = u.process(0.5);
        assert!(first < 1.0 && first > 0.5, "expected a blend, got {first}");

        // Consecutive outputs step down without a jump.
        let mut prev = first;
        for _ in 0..200 {
            let out = u.process(0.5);
            assert!(out <= prev + 1e-6);
            prev = out;
        }

        // After several time constants the unit is fully dry.
        for _ in 0..10_000 {
            u.process(0.5);
        }
        assert_eq!(u.process(0.5), 0.5);
    }

    #[test]
    fn test_unit_param_access() {
        let mut u = unit(1.0, true);
        assert_eq!(u.param_count(), 1);
        assert_eq!(u.find_param("factor"), Some(0));
        assert_eq!(u.find_param("fac"), Some(0));
        assert_eq!(u.find_param("nope"), None);

        u.set_param(0, 3.0);
        assert_eq!(u.param_value(0), 3.0);

        // Out-of-range values clamp
        u.set_param(0, 99.0);
        assert_eq!(u.param_value(0), 4.0);
    }

    #[test]
    fn test_empty_bus_passes_through() {
        let mut bus = ChainBus::new();
        assert_eq!(bus.process(0.7), 0.7);
        assert_eq!(bus.len(), 0);
    }

    #[test]
    fn test_bus_processes_in_series() {
        let mut bus = ChainBus::new();
        bus.push(unit(2.0, true));
        bus.push(unit(3.0, true));

        // 1.0 * 2.0 * 3.0 = 6.0
        assert_eq!(bus.process(1.0), 6.0);
    }

    #[test]
    fn test_bus_skips_disabled_units() {
        let mut bus = ChainBus::new();
        bus.push(unit(2.0, true));
        bus.push(unit(3.0, false));

        assert_eq!(bus.process(1.0), 2.0);
    }

    #[test]
    fn test_bus_find_mut() {
        let mut bus = ChainBus::new();
        let u = unit(2.0, true);
        let id = u.id();
        bus.push(u);

        assert!(bus.find_mut(id).is_some());
        assert!(bus.find_mut(UnitId::next()).is_none());
    }

    #[test]
    fn test_bus_clear_drops_units() {
        let mut bus = ChainBus::new();
        bus.push(unit(2.0, true));
        bus.clear();
        assert_eq!(bus.len(), 0);
        assert_eq!(bus.process(0.5), 0.5);
    }
}
