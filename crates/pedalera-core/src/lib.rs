//! Pedalera Core - DSP primitives for the effects processor
//!
//! Foundational building blocks for real-time audio processing with zero
//! allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for all audio effects
//! - [`EffectWithParams`] - Effect plus parameter introspection through
//!   one vtable, for type-erased units
//!
//! ## Parameter Smoothing
//!
//! Zipper-free parameter changes for click-free automation:
//!
//! - [`SmoothedParam`] - Exponential smoothing (RC-like response)
//! - [`LinearSmoothedParam`] - Linear ramps that land exactly on target
//!
//! ## Filters & Delays
//!
//! - [`Biquad`] - Second-order IIR filter (Direct Form II Transposed)
//!   with RBJ cookbook coefficients
//! - [`BiquadDf1`] - Direct Form I variant with cutoff pre-warping for
//!   accurate high-frequency responses
//! - [`DelayLine`] - Power-of-two circular buffer with fractional
//!   interpolated reads
//!
//! ## Modulation & Dynamics
//!
//! - [`Lfo`] - Low-frequency oscillator (sine, triangle, saw)
//! - [`EnvelopeFollower`] - Amplitude tracking with asymmetric
//!   attack/release
//! - [`limit_value`] - Polynomial soft limiter for feedback paths
//!
//! ## Metering
//!
//! - [`PeakMeter`] - Decaying peak hold
//! - [`GainReductionMeter`] - Worst-reduction-since-last-read tracking
//! - [`RmsMeter`] - One-pole RMS average
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`wet_dry_mix`],
//!   [`ms_to_samples`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets. Disable the
//! default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! pedalera-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Object-safe traits**: Dynamic dispatch where chain composition
//!   needs it

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod effect;
pub mod effect_with_params;
pub mod envelope;
pub mod lfo;
pub mod limiter;
pub mod math;
pub mod meter;
pub mod param;
pub mod param_info;

// Re-export main types at crate root
pub use biquad::{
    Biquad, BiquadDf1, allpass_coefficients, bandpass_peak_coefficients,
    bandpass_skirt_coefficients, high_shelf_coefficients, highpass_coefficients,
    low_shelf_coefficients, lowpass_coefficients, notch_coefficients, peaking_eq_coefficients,
};
pub use delay::{DEFAULT_CAPACITY, DelayLine};
pub use effect::Effect;
pub use effect_with_params::EffectWithParams;
pub use envelope::EnvelopeFollower;
pub use lfo::{Lfo, LfoWaveform};
pub use limiter::{limit_block, limit_value};
pub use math::{
    db_to_linear, flush_denormal, hard_clip, lerp, linear_to_db, ms_to_samples, samples_to_ms,
    wet_dry_mix,
};
pub use meter::{ChannelMeter, GainReductionMeter, PeakMeter, RmsMeter, StereoMeter};
pub use param::{LinearSmoothedParam, SmoothedParam};
pub use param_info::{ParamDescriptor, ParamUnit, ParameterInfo};
