//! Preset serialization for pedalera effect chains.
//!
//! This crate defines the on-disk preset format for the pedalera DSP framework:
//! a versioned JSON document describing an effect chain with its parameter
//! values, plus built-in factory presets.
//!
//! # Features
//!
//! - **Preset Documents**: Load and save effect chains as versioned JSON
//! - **Named Parameters**: Effects store parameters by display name, so
//!   presets stay readable and survive parameter reordering
//! - **Forward Compatibility**: Unknown effect types are preserved through
//!   a load/save cycle rather than dropped
//! - **Factory Presets**: Built-in presets for common use cases
//!
//! # Example
//!
//! ```rust,no_run
//! use pedalera_config::{PresetDocument, EffectEntry};
//!
//! // Load a preset from file
//! let preset = PresetDocument::load("my_preset.json").unwrap();
//!
//! // Create a preset programmatically
//! let preset = PresetDocument::new()
//!     .with_name("Evening Echo")
//!     .with_effect(
//!         EffectEntry::new("echo")
//!             .with_param("Delay Time", 350.0)
//!             .with_param("Feedback", 45.0)
//!             .with_param("Mix", 40.0),
//!     )
//!     .with_effect(EffectEntry::new("exciter").with_enabled(false));
//!
//! // Save it back out
//! preset.save("presets/evening_echo.json").unwrap();
//! ```

mod preset;
mod error;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use preset::{PresetDocument, EffectEntry, PRESET_VERSION};
pub use error::PresetError;
pub use factory_presets::{
    factory_presets, get_factory_preset, factory_preset_names, is_factory_preset,
    FACTORY_PRESET_NAMES,
};
