//! Factory presets bundled with the library.
//!
//! This module provides built-in presets that are always available without
//! requiring external files. They demonstrate common configurations and
//! serve as starting points for users.

use crate::PresetDocument;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "slapback",
    "dub_echo",
    "jet_flanger",
    "slow_swirl",
    "tight_low_end",
    "sparkle",
];

/// JSON content for factory presets.
///
/// These are embedded at compile time and always available.
static FACTORY_PRESETS_JSON: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("slapback", SLAPBACK_PRESET),
    ("dub_echo", DUB_ECHO_PRESET),
    ("jet_flanger", JET_FLANGER_PRESET),
    ("slow_swirl", SLOW_SWIRL_PRESET),
    ("tight_low_end", TIGHT_LOW_END_PRESET),
    ("sparkle", SPARKLE_PRESET),
];

/// Initialization preset - every effect loaded but disabled.
const INIT_PRESET: &str = r#"
{
    "version": 1,
    "name": "Init",
    "inputGain": 1.0,
    "outputGain": 1.0,
    "effects": [
        {
            "effectType": "echo",
            "enabled": false,
            "params": { "Delay Time": 300.0, "Feedback": 40.0, "Mix": 50.0, "Wobble": 0.0 }
        },
        {
            "effectType": "flanger",
            "enabled": false,
            "params": { "Rate": 0.5, "Depth": 35.0, "Delay": 2.0, "Feedback": 50.0, "Mix": 50.0 }
        },
        {
            "effectType": "phaser",
            "enabled": false,
            "params": { "Rate": 0.3, "Center Freq": 500.0, "Octaves": 2.0, "Feedback": 50.0, "Mix": 50.0 }
        },
        {
            "effectType": "multiband",
            "enabled": false,
            "params": { "Low Threshold": -18.0, "Low Mid Threshold": -18.0, "High Mid Threshold": -18.0, "High Threshold": -18.0 }
        },
        {
            "effectType": "exciter",
            "enabled": false,
            "params": { "Dry Level": 100.0, "Even Harmonics": 30.0, "Odd Harmonics": 30.0, "Output Level": 50.0 }
        }
    ]
}
"#;

/// Slapback preset - short single echo.
const SLAPBACK_PRESET: &str = r#"
{
    "version": 1,
    "name": "Slapback",
    "inputGain": 1.0,
    "outputGain": 1.0,
    "effects": [
        {
            "effectType": "echo",
            "enabled": true,
            "params": { "Delay Time": 110.0, "Feedback": 15.0, "Mix": 35.0, "Wobble": 0.5 }
        }
    ]
}
"#;

/// Dub echo preset - long regenerating echo with tape drift.
const DUB_ECHO_PRESET: &str = r#"
{
    "version": 1,
    "name": "Dub Echo",
    "inputGain": 1.0,
    "outputGain": 0.9,
    "effects": [
        {
            "effectType": "echo",
            "enabled": true,
            "params": { "Delay Time": 420.0, "Feedback": 65.0, "Mix": 45.0, "Wobble": 2.5 }
        },
        {
            "effectType": "exciter",
            "enabled": true,
            "params": { "Dry Level": 100.0, "Even Harmonics": 25.0, "Odd Harmonics": 10.0, "Output Level": 50.0 }
        }
    ]
}
"#;

/// Jet flanger preset - deep sweep with strong feedback.
const JET_FLANGER_PRESET: &str = r#"
{
    "version": 1,
    "name": "Jet Flanger",
    "inputGain": 1.0,
    "outputGain": 1.0,
    "effects": [
        {
            "effectType": "flanger",
            "enabled": true,
            "params": { "Rate": 0.3, "Depth": 90.0, "Delay": 1.0, "Feedback": 70.0, "Mix": 50.0 }
        }
    ]
}
"#;

/// Slow swirl preset - wide lazy phaser.
const SLOW_SWIRL_PRESET: &str = r#"
{
    "version": 1,
    "name": "Slow Swirl",
    "inputGain": 1.0,
    "outputGain": 1.0,
    "effects": [
        {
            "effectType": "phaser",
            "enabled": true,
            "params": { "Rate": 0.2, "Center Freq": 600.0, "Octaves": 2.5, "Feedback": 40.0, "Mix": 50.0 }
        }
    ]
}
"#;

/// Tight low end preset - firm compression on the bottom bands only.
const TIGHT_LOW_END_PRESET: &str = r#"
{
    "version": 1,
    "name": "Tight Low End",
    "inputGain": 1.0,
    "outputGain": 1.0,
    "effects": [
        {
            "effectType": "multiband",
            "enabled": true,
            "params": {
                "Low Threshold": -24.0,
                "Low Ratio": 6.0,
                "Low Attack": 5.0,
                "Low Release": 120.0,
                "Low Makeup": 2.0,
                "Low Mid Threshold": -20.0,
                "Low Mid Ratio": 3.0,
                "Crossover 1": 150.0
            }
        }
    ]
}
"#;

/// Sparkle preset - gentle harmonic lift.
const SPARKLE_PRESET: &str = r#"
{
    "version": 1,
    "name": "Sparkle",
    "inputGain": 1.0,
    "outputGain": 1.0,
    "effects": [
        {
            "effectType": "exciter",
            "enabled": true,
            "params": { "Dry Level": 100.0, "Even Harmonics": 45.0, "Odd Harmonics": 20.0, "Output Level": 55.0 }
        }
    ]
}
"#;

/// Get all factory presets.
///
/// Returns a vector of all built-in presets that ship with the library.
///
/// # Example
///
/// ```rust
/// use pedalera_config::factory_presets;
///
/// let presets = factory_presets();
/// for preset in &presets {
///     println!("  - {}", preset.name.as_deref().unwrap_or("unnamed"));
/// }
/// ```
pub fn factory_presets() -> Vec<PresetDocument> {
    FACTORY_PRESETS_JSON
        .iter()
        .filter_map(|(_, json)| PresetDocument::from_json(json).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// Returns `Some(PresetDocument)` if a factory preset with the given name
/// exists, `None` otherwise. The name match is case-insensitive and
/// accepts both the internal id and the display name.
///
/// # Example
///
/// ```rust
/// use pedalera_config::get_factory_preset;
///
/// if let Some(preset) = get_factory_preset("slapback") {
///     println!("Found: {}", preset.name.as_deref().unwrap_or(""));
/// }
/// ```
pub fn get_factory_preset(name: &str) -> Option<PresetDocument> {
    let name_lower = name.to_lowercase();

    for (preset_name, json) in FACTORY_PRESETS_JSON {
        if preset_name.to_lowercase() == name_lower {
            return PresetDocument::from_json(json).ok();
        }
    }

    // Also try matching against the preset's display name
    for (_, json) in FACTORY_PRESETS_JSON {
        if let Ok(preset) = PresetDocument::from_json(json)
            && preset.name.as_deref().is_some_and(|n| n.to_lowercase() == name_lower)
        {
            return Some(preset);
        }
    }

    None
}

/// Get the names of all factory presets.
///
/// Returns the internal identifiers used for factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_JSON.iter().map(|(name, _)| *name).collect()
}

/// Check if a preset name is a factory preset.
///
/// Returns true if the given name matches any factory preset
/// (case-insensitive, internal id or display name).
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_presets_load() {
        let presets = factory_presets();
        assert_eq!(presets.len(), FACTORY_PRESET_NAMES.len());

        let names: Vec<_> = presets
            .iter()
            .filter_map(|p| p.name.as_deref())
            .collect();
        assert!(names.contains(&"Init"));
        assert!(names.contains(&"Slapback"));
        assert!(names.contains(&"Jet Flanger"));
        assert!(names.contains(&"Tight Low End"));
    }

    #[test]
    fn test_get_factory_preset() {
        // By internal name
        let preset = get_factory_preset("slapback").expect("slapback should exist");
        assert_eq!(preset.name.as_deref(), Some("Slapback"));

        // By display name
        let preset = get_factory_preset("Jet Flanger").expect("Jet Flanger should exist");
        assert_eq!(preset.name.as_deref(), Some("Jet Flanger"));

        // Case insensitive
        let preset = get_factory_preset("SPARKLE").expect("SPARKLE should exist");
        assert_eq!(preset.name.as_deref(), Some("Sparkle"));

        // Non-existent
        assert!(get_factory_preset("nonexistent").is_none());
    }

    #[test]
    fn test_factory_preset_names() {
        let names = factory_preset_names();
        assert!(names.contains(&"init"));
        assert!(names.contains(&"dub_echo"));
        assert!(names.contains(&"tight_low_end"));
    }

    #[test]
    fn test_is_factory_preset() {
        assert!(is_factory_preset("init"));
        assert!(is_factory_preset("Slow Swirl"));
        assert!(!is_factory_preset("my_custom_preset"));
    }

    #[test]
    fn test_all_factory_presets_valid() {
        for (name, json) in FACTORY_PRESETS_JSON {
            let result = PresetDocument::from_json(json);
            assert!(
                result.is_ok(),
                "factory preset '{name}' should parse: {result:?}"
            );

            let preset = result.unwrap();
            assert!(
                preset.name.is_some(),
                "preset '{name}' should have a display name"
            );
        }
    }

    #[test]
    fn test_init_preset_has_all_effects_disabled() {
        let init = get_factory_preset("init").expect("init should exist");

        assert_eq!(init.len(), 5);
        for effect in &init.effects {
            assert!(
                !effect.enabled,
                "init preset effect '{}' should be disabled",
                effect.effect_type
            );
        }
    }

    #[test]
    fn test_slapback_preset_structure() {
        let slapback = get_factory_preset("slapback").expect("slapback should exist");

        let echo = slapback
            .effects
            .iter()
            .find(|e| e.effect_type == "echo")
            .expect("slapback should contain an echo");
        assert!(echo.enabled);
        assert_eq!(echo.param("Delay Time"), Some(110.0));
        assert!(echo.param("Feedback").unwrap() < 30.0, "slapback is a single repeat");
    }

    #[test]
    fn test_dub_echo_regenerates() {
        let dub = get_factory_preset("dub_echo").expect("dub_echo should exist");

        let echo = dub.effects.iter().find(|e| e.effect_type == "echo").unwrap();
        assert!(
            echo.param("Feedback").unwrap() > 50.0,
            "dub echo needs long regeneration"
        );
        assert!(echo.param("Wobble").unwrap() > 0.0, "dub echo drifts");
    }
}
