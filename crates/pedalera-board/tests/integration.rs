//! Integration tests for pedalera-board.
//!
//! These tests drive whole scenarios through the board: factory presets,
//! chain edits mid-signal, and the preset JSON cycle end to end.

use pedalera_board::Pedalboard;
use pedalera_config::get_factory_preset;
use tracing_subscriber::EnvFilter;

const SR: f32 = 48000.0;

/// Route board logs through the test harness; `RUST_LOG=debug` shows
/// the structural-change events.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_test_writer()
        .try_init()
        .ok();
}

fn sine(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / SR).sin() * amplitude)
        .collect()
}

/// Importing the slapback factory preset produces an audible repeat at
/// the preset's delay time.
#[test]
fn test_factory_preset_drives_the_board() {
    init_tracing();
    let preset = get_factory_preset("slapback").expect("slapback ships with the crate");

    let mut board = Pedalboard::new(SR);
    board.import_preset(&preset);
    assert_eq!(board.effect_types(), vec!["echo"]);

    // Impulse in, then silence. Slapback is a 110 ms echo, so the first
    // repeat lands around sample 5280.
    let mut input = vec![0.0f32; 8000];
    input[0] = 1.0;
    let mut output = vec![0.0f32; 8000];
    board.process_block(&input, &mut output);

    let quiet: f32 = output[2500..4500].iter().fold(0.0, |m, y| m.max(y.abs()));
    assert!(quiet < 0.02, "between the dry hit and the repeat: {quiet}");

    let repeat: f32 = output[5180..5380].iter().fold(0.0, |m, y| m.max(y.abs()));
    assert!(repeat > 0.15, "repeat should land near 110 ms: {repeat}");
}

/// Editing the chain mid-note crossfades; the output never drops out
/// during the swap window.
#[test]
fn test_chain_edit_mid_note_never_drops_audio() {
    init_tracing();
    let mut board = Pedalboard::new(SR);
    let first = board.add_effect("echo").expect("echo registered");
    board.set_effect_enabled(first, false);

    // Let the add crossfade and the disable blend fully settle on DC.
    let mut out = 0.0;
    for _ in 0..20_000 {
        out = board.process(1.0);
    }
    assert_eq!(out, 1.0, "disabled unit should be exact passthrough");

    // Add a second unit while the note is held. The new bus carries an
    // active echo (about half amplitude on DC before its first repeat),
    // so the blend may dip, but it must never approach silence.
    board.add_effect("echo").expect("echo registered");
    assert!(board.is_crossfading());

    for i in 0..1500 {
        let y = board.process(1.0);
        assert!(
            y > 0.45,
            "output dropped to {y} at sample {i} during the swap"
        );
    }
    assert!(!board.is_crossfading(), "15 ms window has long passed");
}

/// Sweeping a parameter while audio runs stays bounded and finite.
#[test]
fn test_live_parameter_automation_stays_clean() {
    init_tracing();
    let mut board = Pedalboard::new(SR);
    let flanger = board.add_effect("flanger").expect("flanger registered");
    board.update_param(flanger, "Feedback", 70.0);

    let input = sine(220.0, 0.5, 24_000);
    for (i, &x) in input.iter().enumerate() {
        if i % 64 == 0 {
            let sweep = i as f32 / 24_000.0;
            board.update_param(flanger, "Rate", 0.1 + sweep * 4.9);
            board.update_param(flanger, "Depth", sweep * 100.0);
        }
        let y = board.process(x);
        assert!(y.is_finite(), "sample {i} went non-finite");
        assert!(y.abs() < 4.0, "sample {i} blew up: {y}");
    }
}

/// Toggling global bypass mid-signal fades instead of stepping.
#[test]
fn test_bypass_toggle_while_playing() {
    init_tracing();
    let mut board = Pedalboard::new(SR);
    board.add_effect("echo").expect("echo registered");

    let input = sine(1000.0, 0.5, 30_000);
    let mut previous = 0.0;
    for (i, &x) in input.iter().enumerate() {
        if i == 10_000 {
            board.set_global_bypass(true);
        }
        if i == 20_000 {
            board.set_global_bypass(false);
        }
        let y = board.process(x);
        let step = (y - previous).abs();
        assert!(
            step < 0.2,
            "sample {i} jumped by {step}; fades should stay smooth"
        );
        previous = y;
    }
}

/// A chain survives export, JSON serialization, and re-import on a
/// different board.
#[test]
fn test_full_preset_cycle_through_json() {
    init_tracing();
    let mut source = Pedalboard::new(SR);
    let echo = source.add_effect("echo").expect("echo registered");
    let exciter = source.add_effect("exciter").expect("exciter registered");
    source.update_param(echo, "Delay Time", 420.0);
    source.update_param(echo, "Feedback", 55.0);
    source.update_param(exciter, "Even Harmonics", 35.0);
    source.set_effect_enabled(exciter, false);
    source.set_input_gain(1.2);

    let json = source
        .export_preset()
        .with_name("Tape Sparkle")
        .to_json_pretty()
        .expect("chain serializes");

    let mut target = Pedalboard::new(SR);
    target.import_preset_json(&json);

    assert_eq!(target.effect_types(), vec!["echo", "exciter"]);
    assert!(target.units()[0].is_enabled());
    assert!(!target.units()[1].is_enabled());
    assert_eq!(target.input_gain(), 1.2);

    let doc = target.export_preset();
    let delay = doc.get(0).unwrap().param("Delay Time").unwrap();
    let even = doc.get(1).unwrap().param("Even Harmonics").unwrap();
    assert!((delay - 420.0).abs() < 1e-3, "got {delay}");
    assert!((even - 35.0).abs() < 1e-3, "got {even}");

    // Both boards produce the same audio for the same input.
    let input = sine(330.0, 0.3, 4096);
    let mut out_a = vec![0.0f32; 4096];
    let mut out_b = vec![0.0f32; 4096];
    source.reset();
    source.process_block(&input, &mut out_a);
    target.reset();
    target.process_block(&input, &mut out_b);
    for (i, (a, b)) in out_a.iter().zip(out_b.iter()).enumerate() {
        assert!((a - b).abs() < 1e-4, "sample {i}: {a} vs {b}");
    }
}
