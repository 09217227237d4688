//! Parameter metadata and the introspection trait effects implement.
//!
//! Every effect exposes its controls as an indexed list of
//! [`ParamDescriptor`]s. Hosts (preset loader, control surfaces) talk to
//! effects exclusively through [`ParameterInfo`] - reading descriptors,
//! getting and setting values by index, or resolving an index from a
//! parameter name. Values are always in the descriptor's natural unit
//! (milliseconds, Hz, dB, percent), never pre-normalized.

/// Unit of a parameter value, used for display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - gain, threshold, and level parameters.
    Decibels,

    /// Hertz (Hz) - filter cutoff, LFO rate, crossover frequency.
    Hertz,

    /// Milliseconds (ms) - delay, attack, release times.
    Milliseconds,

    /// Percentage (%) - mix, depth, feedback.
    Percent,

    /// Ratio (n:1) - compression ratios.
    Ratio,

    /// No unit - dimensionless parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::Ratio => ":1",
            ParamUnit::None => "",
        }
    }
}

/// Describes a single parameter: display names, unit, range, default.
///
/// `short_name` should stay at 8 characters or fewer so hardware LCDs
/// can show it unabbreviated. `step` is the recommended increment for
/// encoder control: `0.01` for continuous values, `1.0` for coarse or
/// discrete ones.
///
/// # Example
///
/// ```rust
/// use pedalera_core::ParamDescriptor;
///
/// let time = ParamDescriptor::time_ms("Delay Time", "Time", 1.0, 2000.0, 250.0);
/// assert_eq!(time.clamp(5000.0), 2000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Delay Time").
    pub name: &'static str,

    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Default value on initialization or reset.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    pub step: f32,
}

impl ParamDescriptor {
    /// Standard mix parameter (0-100 %, default 50 %).
    pub const fn mix() -> Self {
        Self {
            name: "Mix",
            short_name: "Mix",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default: 50.0,
            step: 1.0,
        }
    }

    /// Standard modulation depth parameter (0-100 %, default 50 %).
    pub const fn depth() -> Self {
        Self {
            name: "Depth",
            short_name: "Depth",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default: 50.0,
            step: 1.0,
        }
    }

    /// Standard feedback parameter (0-95 %, default 50 %).
    ///
    /// Capped below 100 % so a recirculating delay can't run away.
    pub const fn feedback() -> Self {
        Self {
            name: "Feedback",
            short_name: "Fdbk",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 95.0,
            default: 50.0,
            step: 1.0,
        }
    }

    /// Time parameter in milliseconds.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Milliseconds,
            min,
            max,
            default,
            step: 1.0,
        }
    }

    /// Gain parameter in decibels.
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
        }
    }

    /// Frequency parameter in Hz.
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 1.0,
        }
    }

    /// Standard LFO rate parameter in Hz.
    pub const fn rate_hz(min: f32, max: f32, default: f32) -> Self {
        Self {
            name: "Rate",
            short_name: "Rate",
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 0.05,
        }
    }

    /// Compression ratio parameter (n:1).
    pub const fn ratio(min: f32, max: f32, default: f32) -> Self {
        Self {
            name: "Ratio",
            short_name: "Ratio",
            unit: ParamUnit::Ratio,
            min,
            max,
            default,
            step: 0.1,
        }
    }

    /// Clamps a value to this parameter's valid range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to the normalized 0.0-1.0 range.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            0.0
        } else {
            ((value - self.min) / range).clamp(0.0, 1.0)
        }
    }

    /// Converts a normalized 0.0-1.0 value to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// Parameter introspection for effects.
///
/// Implementations index their parameters from zero. `set_param` clamps
/// to the descriptor range and ignores out-of-bounds indices; `get_param`
/// returns `0.0` for them. That keeps control-surface glue free of error
/// plumbing: a stale index or wild value degrades to a no-op.
///
/// # Example
///
/// ```rust
/// use pedalera_core::{ParamDescriptor, ParameterInfo};
///
/// struct Tremolo {
///     rate_hz: f32,
/// }
///
/// impl ParameterInfo for Tremolo {
///     fn param_count(&self) -> usize {
///         1
///     }
///
///     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
///         match index {
///             0 => Some(ParamDescriptor::rate_hz(0.1, 20.0, 5.0)),
///             _ => None,
///         }
///     }
///
///     fn get_param(&self, index: usize) -> f32 {
///         match index {
///             0 => self.rate_hz,
///             _ => 0.0,
///         }
///     }
///
///     fn set_param(&mut self, index: usize, value: f32) {
///         if index == 0 {
///             self.rate_hz = value.clamp(0.1, 20.0);
///         }
///     }
/// }
///
/// let mut trem = Tremolo { rate_hz: 5.0 };
/// let idx = trem.find_param_by_name("rate").unwrap();
/// trem.set_param(idx, 100.0);
/// assert_eq!(trem.get_param(idx), 20.0);
/// ```
pub trait ParameterInfo {
    /// Number of parameters this effect exposes.
    ///
    /// Valid parameter indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` past the end.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index` (`0.0` past the end).
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`, clamping to the descriptor range.
    /// Out-of-bounds indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Finds a parameter index by name, case-insensitively, matching
    /// either the full or short name.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i)
                && (desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name))
            {
                return Some(i);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEffect {
        gain: f32,
        mix: f32,
    }

    impl ParameterInfo for TestEffect {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(ParamDescriptor::gain_db("Gain", "Gain", -60.0, 12.0, 0.0)),
                1 => Some(ParamDescriptor::mix()),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            match index {
                0 => self.gain,
                1 => self.mix,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            let Some(desc) = self.param_info(index) else {
                return;
            };
            match index {
                0 => self.gain = desc.clamp(value),
                1 => self.mix = desc.clamp(value),
                _ => {}
            }
        }
    }

    #[test]
    fn test_set_param_clamps() {
        let mut effect = TestEffect { gain: 0.0, mix: 50.0 };

        effect.set_param(0, 100.0);
        assert_eq!(effect.get_param(0), 12.0);

        effect.set_param(0, -100.0);
        assert_eq!(effect.get_param(0), -60.0);
    }

    #[test]
    fn test_out_of_bounds_is_harmless() {
        let mut effect = TestEffect { gain: 0.0, mix: 50.0 };

        effect.set_param(99, 1.0);
        assert_eq!(effect.get_param(99), 0.0);
        assert!(effect.param_info(99).is_none());
    }

    #[test]
    fn test_find_param_by_name() {
        let effect = TestEffect { gain: 0.0, mix: 50.0 };

        assert_eq!(effect.find_param_by_name("gain"), Some(0));
        assert_eq!(effect.find_param_by_name("MIX"), Some(1));
        assert_eq!(effect.find_param_by_name("resonance"), None);
    }

    #[test]
    fn test_descriptor_clamp() {
        let desc = ParamDescriptor::time_ms("Attack", "Attack", 0.1, 100.0, 10.0);
        assert_eq!(desc.clamp(0.0), 0.1);
        assert_eq!(desc.clamp(50.0), 50.0);
        assert_eq!(desc.clamp(500.0), 100.0);
    }

    #[test]
    fn test_normalize_roundtrip() {
        let desc = ParamDescriptor::frequency_hz("Center", "Center", 100.0, 2000.0, 800.0);
        let normalized = desc.normalize(800.0);
        assert!((desc.denormalize(normalized) - 800.0).abs() < 1e-3);
        assert_eq!(desc.normalize(100.0), 0.0);
        assert_eq!(desc.normalize(2000.0), 1.0);
    }

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(ParamUnit::Decibels.suffix(), " dB");
        assert_eq!(ParamUnit::Percent.suffix(), "%");
        assert_eq!(ParamUnit::Ratio.suffix(), ":1");
        assert_eq!(ParamUnit::None.suffix(), "");
    }
}
