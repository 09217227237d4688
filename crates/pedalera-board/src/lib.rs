//! Pedalera Board - Live effect chain with glitch-free reconfiguration
//!
//! This crate ties the pedalera stack together into a playable unit:
//!
//! - [`Pedalboard`] - Gain staging, metering, and an ordered chain of
//!   effect units addressed by stable [`UnitId`]s
//! - [`LevelSnapshot`] - Throttled input/output peak and RMS readings
//! - [`VisualSnapshot`] - Waveform window and magnitude spectrum of the
//!   most recent output
//!
//! Structural changes (adding, removing, reordering, importing a
//! preset) never touch the running chain directly. The board keeps two
//! chain buses; edits rebuild the inactive one from the captured unit
//! settings and a 15 ms linear crossfade carries the audio over, so a
//! chain edit mid-note fades rather than clicks. Parameter changes and
//! per-unit enable toggles apply in place on both buses through their
//! own smoothers.
//!
//! Presets move through [`pedalera_config`] documents:
//! [`Pedalboard::export_preset`] captures the chain,
//! [`Pedalboard::import_preset`] replaces it, with unknown effect
//! types skipped rather than rejected.
//!
//! ## Example
//!
//! ```rust
//! use pedalera_board::Pedalboard;
//!
//! let mut board = Pedalboard::new(48000.0);
//! let echo = board.add_effect("echo").unwrap();
//! let flanger = board.add_effect("flanger").unwrap();
//!
//! board.update_param(echo, "Delay Time", 250.0);
//! board.set_effect_enabled(flanger, false);
//!
//! let input = vec![0.0f32; 512];
//! let mut output = vec![0.0f32; 512];
//! board.process_block(&input, &mut output);
//!
//! if let Some(levels) = board.levels() {
//!     println!("out peak: {:.3}", levels.output_peak);
//! }
//! ```

pub mod board;
pub mod bus;
pub mod error;
pub mod visual;

// Re-export main types at crate root
pub use board::{LevelSnapshot, Pedalboard};
pub use bus::{EffectUnit, UnitId};
pub use error::BoardError;
pub use visual::{VisualSnapshot, DEFAULT_VISUAL_WINDOW};
