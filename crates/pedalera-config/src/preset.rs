//! Preset document format and operations.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PresetError;

/// Format version this build reads and writes.
pub const PRESET_VERSION: u32 = 1;

fn default_gain() -> f32 {
    1.0
}

fn default_enabled() -> bool {
    true
}

/// Serialized snapshot of a full effect chain.
///
/// Presets are stored as JSON documents with camelCase keys. The
/// `version` field gates format evolution: loaders reject any version
/// they do not understand instead of guessing. Unknown effect types and
/// unknown parameter names survive a load/save cycle untouched, so a
/// preset written by a newer build keeps its data when edited here.
///
/// # JSON Format
///
/// ```json
/// {
///   "version": 1,
///   "name": "Slapback",
///   "inputGain": 1.0,
///   "outputGain": 0.9,
///   "effects": [
///     {
///       "effectType": "echo",
///       "enabled": true,
///       "params": { "Delay Time": 110.0, "Feedback": 20.0, "Mix": 35.0 }
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetDocument {
    /// Format version; always [`PRESET_VERSION`] for documents this
    /// build writes.
    pub version: u32,

    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Linear gain applied before the chain.
    #[serde(default = "default_gain")]
    pub input_gain: f32,

    /// Linear gain applied after the chain.
    #[serde(default = "default_gain")]
    pub output_gain: f32,

    /// Effects in processing order.
    #[serde(default)]
    pub effects: Vec<EffectEntry>,
}

impl PresetDocument {
    /// Create an empty preset at the current format version.
    pub fn new() -> Self {
        Self {
            version: PRESET_VERSION,
            name: None,
            input_gain: 1.0,
            output_gain: 1.0,
            effects: Vec::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the input gain.
    pub fn with_input_gain(mut self, gain: f32) -> Self {
        self.input_gain = gain;
        self
    }

    /// Set the output gain.
    pub fn with_output_gain(mut self, gain: f32) -> Self {
        self.output_gain = gain;
        self
    }

    /// Add an effect to the preset.
    pub fn with_effect(mut self, effect: EffectEntry) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add multiple effects to the preset.
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = EffectEntry>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Parse a preset from a JSON string.
    ///
    /// Returns [`PresetError::Parse`] for malformed JSON and
    /// [`PresetError::UnsupportedVersion`] when the document declares a
    /// version other than [`PRESET_VERSION`].
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let document: PresetDocument = serde_json::from_str(json).map_err(PresetError::Parse)?;
        if document.version != PRESET_VERSION {
            return Err(PresetError::UnsupportedVersion {
                found: document.version,
            });
        }
        Ok(document)
    }

    /// Serialize the preset to a compact JSON string.
    pub fn to_json(&self) -> Result<String, PresetError> {
        serde_json::to_string(self).map_err(PresetError::Serialize)
    }

    /// Serialize the preset to an indented JSON string.
    pub fn to_json_pretty(&self) -> Result<String, PresetError> {
        serde_json::to_string_pretty(self).map_err(PresetError::Serialize)
    }

    /// Load a preset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PresetError::read_file(path, e))?;
        Self::from_json(&content)
    }

    /// Save the preset to a JSON file, creating parent directories as
    /// needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| PresetError::create_dir(parent, e))?;
        }

        let content = self.to_json_pretty()?;
        std::fs::write(path, content).map_err(|e| PresetError::write_file(path, e))?;
        Ok(())
    }

    /// Number of effects in the preset.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the preset has no effects.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Get an effect entry by index.
    pub fn get(&self, index: usize) -> Option<&EffectEntry> {
        self.effects.get(index)
    }

    /// Get a mutable effect entry by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut EffectEntry> {
        self.effects.get_mut(index)
    }

    /// Iterate over effect entries.
    pub fn iter(&self) -> impl Iterator<Item = &EffectEntry> {
        self.effects.iter()
    }

    /// Iterate over effect entries mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EffectEntry> {
        self.effects.iter_mut()
    }

    /// Effect type ids in chain order.
    pub fn effect_types(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.effect_type.as_str()).collect()
    }
}

impl Default for PresetDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// One effect in a preset: its type id, enable state, and parameters.
///
/// Parameters are stored by descriptor name in descriptor units (e.g.
/// percent values 0-100). A `BTreeMap` keeps serialization order
/// stable, so saved presets diff cleanly.
///
/// # Example
///
/// ```rust
/// use pedalera_config::EffectEntry;
///
/// let entry = EffectEntry::new("echo")
///     .with_param("Delay Time", 110.0)
///     .with_param("Feedback", 20.0);
///
/// assert_eq!(entry.effect_type, "echo");
/// assert!(entry.enabled);
/// assert_eq!(entry.param("Feedback"), Some(20.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EffectEntry {
    /// Effect type id as registered (e.g. "echo", "multiband").
    pub effect_type: String,

    /// Whether the effect processes audio or passes it through.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Parameter values keyed by descriptor name.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl EffectEntry {
    /// Create an enabled effect entry with no parameters.
    pub fn new(effect_type: impl Into<String>) -> Self {
        Self {
            effect_type: effect_type.into(),
            enabled: true,
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter value.
    pub fn with_param(mut self, name: impl Into<String>, value: f32) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Set whether the effect is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Get a parameter value by name.
    pub fn param(&self, name: &str) -> Option<f32> {
        self.params.get(name).copied()
    }

    /// Set a parameter value by name.
    pub fn set_param(&mut self, name: impl Into<String>, value: f32) {
        self.params.insert(name.into(), value);
    }
}
