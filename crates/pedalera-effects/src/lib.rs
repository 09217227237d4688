//! Pedalera Effects - Audio effect implementations
//!
//! This crate provides the effects that ship with pedalera, built on
//! pedalera-core:
//!
//! - [`Echo`] - Feedback echo with smoothed delay time and tape wobble
//! - [`Flanger`] - Swept short delay with feedback
//! - [`Phaser`] - Four-stage allpass phaser with a shared sweep
//! - [`MultibandCompressor`] - Four-band dynamics over Linkwitz-Riley crossovers
//! - [`HarmonicExciter`] - Separate even and odd harmonic generation
//!
//! [`synthesize_room_ir`] builds deterministic stereo room impulse
//! responses on the control plane, sized by the [`RoomProfile`] presets.
//!
//! ## Example
//!
//! ```rust
//! use pedalera_core::Effect;
//! use pedalera_effects::{Echo, Phaser};
//!
//! let mut echo = Echo::new(48000.0);
//! echo.set_delay_time_ms(250.0);
//! echo.set_feedback(0.35);
//!
//! let mut phaser = Phaser::new(48000.0);
//! phaser.set_rate(0.25);
//!
//! // Run effects in series
//! let output = phaser.process(echo.process(0.2));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod echo;
pub mod flanger;
pub mod phaser;
pub mod multiband;
pub mod exciter;
pub mod room_ir;

// Re-export main types at crate root
pub use echo::Echo;
pub use flanger::Flanger;
pub use phaser::Phaser;
pub use multiband::{BandCompressor, CrossoverNetwork, MultibandCompressor};
pub use exciter::HarmonicExciter;
pub use room_ir::{synthesize_room_ir, RoomParams, RoomProfile, StereoIr};
