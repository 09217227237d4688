//! Effect registry and factory for pedalera audio effects.
//!
//! This crate provides a centralized registry for discovering and instantiating
//! audio effects. It enables dynamic effect selection by name and provides
//! metadata for building user interfaces and preset loaders.
//!
//! # Features
//!
//! - **Effect Discovery**: List all available effects with metadata
//! - **Factory Pattern**: Create effects by type id at runtime
//! - **Category System**: Effects organized by type (dynamics, modulation, etc.)
//! - **Parameter Lookup**: Resolve parameter names to indices for any effect
//!
//! # Example
//!
//! ```rust
//! use pedalera_registry::{EffectRegistry, EffectCategory};
//! use pedalera_core::Effect;
//!
//! let registry = EffectRegistry::new();
//!
//! // List all effects
//! for effect in registry.all_effects() {
//!     println!("{}: {}", effect.name, effect.description);
//! }
//!
//! // Create an effect by type id
//! if let Some(mut echo) = registry.create("echo", 48000.0) {
//!     let output = echo.process(0.5);
//! }
//!
//! // Filter by category
//! for effect in registry.effects_in_category(EffectCategory::Modulation) {
//!     println!("Modulation effect: {}", effect.name);
//! }
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! pedalera-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

pub use pedalera_core::EffectWithParams;
use pedalera_effects::{Echo, Flanger, HarmonicExciter, MultibandCompressor, Phaser};

/// Category of audio effect for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Dynamics processing (compressors, limiters)
    Dynamics,
    /// Distortion, saturation, and harmonic generation
    Distortion,
    /// Modulation effects (flanger, phaser, vibrato)
    Modulation,
    /// Time-based effects (echo, reverb)
    TimeBased,
}

impl EffectCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::Dynamics => "Dynamics",
            EffectCategory::Distortion => "Distortion",
            EffectCategory::Modulation => "Modulation",
            EffectCategory::TimeBased => "Time-Based",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            EffectCategory::Dynamics => {
                "Compressors, limiters, and other dynamics processors"
            }
            EffectCategory::Distortion => {
                "Distortion, saturation, and harmonic generation effects"
            }
            EffectCategory::Modulation => "Flanger, phaser, and other modulation effects",
            EffectCategory::TimeBased => "Echo, reverb, and other time-based effects",
        }
    }
}

/// Describes an effect in the registry.
#[derive(Debug, Clone)]
pub struct EffectDescriptor {
    /// Unique identifier for the effect (lowercase, no spaces).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the effect.
    pub description: &'static str,
    /// Category for organization.
    pub category: EffectCategory,
    /// Number of parameters.
    pub param_count: usize,
}

/// Factory function type for creating effects.
type EffectFactory = fn(f32) -> Box<dyn EffectWithParams + Send>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: EffectDescriptor,
    factory: EffectFactory,
}

/// Registry of all available audio effects.
///
/// The registry provides a centralized way to discover and instantiate
/// audio effects by type id. All built-in effects are automatically
/// registered.
pub struct EffectRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Create a new registry with all built-in effects registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(5),
        };
        registry.register_builtin_effects();
        registry
    }

    /// Register all built-in effects.
    fn register_builtin_effects(&mut self) {
        // Echo
        self.register(
            EffectDescriptor {
                id: "echo",
                name: "Echo",
                description: "Feedback echo with smoothed delay time and tape wobble",
                category: EffectCategory::TimeBased,
                param_count: 4,
            },
            |sr| Box::new(Echo::new(sr)),
        );

        // Flanger
        self.register(
            EffectDescriptor {
                id: "flanger",
                name: "Flanger",
                description: "Classic flanger with swept short delay and feedback",
                category: EffectCategory::Modulation,
                param_count: 5,
            },
            |sr| Box::new(Flanger::new(sr)),
        );

        // Phaser
        self.register(
            EffectDescriptor {
                id: "phaser",
                name: "Phaser",
                description: "Four-stage allpass phaser with a shared sweep",
                category: EffectCategory::Modulation,
                param_count: 5,
            },
            |sr| Box::new(Phaser::new(sr)),
        );

        // Multiband Compressor
        self.register(
            EffectDescriptor {
                id: "multiband",
                name: "Multiband Compressor",
                description: "Four-band dynamics over Linkwitz-Riley crossovers",
                category: EffectCategory::Dynamics,
                param_count: 31,
            },
            |sr| Box::new(MultibandCompressor::new(sr)),
        );

        // Harmonic Exciter
        self.register(
            EffectDescriptor {
                id: "exciter",
                name: "Harmonic Exciter",
                description: "Separate even and odd harmonic generation paths",
                category: EffectCategory::Distortion,
                param_count: 4,
            },
            |sr| Box::new(HarmonicExciter::new(sr)),
        );
    }

    /// Register an effect with the registry.
    fn register(&mut self, descriptor: EffectDescriptor, factory: EffectFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Returns descriptors for all registered effects.
    pub fn all_effects(&self) -> Vec<&EffectDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for effects in a specific category.
    pub fn effects_in_category(&self, category: EffectCategory) -> Vec<&EffectDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by effect type id.
    pub fn get(&self, id: &str) -> Option<&EffectDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| &e.descriptor)
    }

    /// Create an effect instance by type id.
    ///
    /// Returns `None` if the id is not registered. The returned effect
    /// supports both audio processing (via `Effect`) and parameter access
    /// (via [`EffectWithParams`]).
    pub fn create(&self, id: &str, sample_rate: f32) -> Option<Box<dyn EffectWithParams + Send>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| (e.factory)(sample_rate))
    }

    /// Find a parameter index by name for a given effect type.
    ///
    /// Creates a temporary effect instance to scan parameter descriptors;
    /// full and short names match case-insensitively. Returns `None` if
    /// the effect type or parameter name is not found.
    pub fn param_index_by_name(&self, effect_id: &str, param_name: &str) -> Option<usize> {
        let effect = self.create(effect_id, 48000.0)?;
        effect.effect_find_param(param_name)
    }

    /// Returns the number of registered effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no effects are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
