//! Integration tests for pedalera-config.
//!
//! These tests verify end-to-end functionality across modules, including
//! the file I/O paths that the unit tests leave alone.

use pedalera_config::{
    EffectEntry, PresetDocument, PresetError,
    factory_presets, get_factory_preset,
};
use tempfile::TempDir;

/// Test preset save/load roundtrip through a real file.
#[test]
fn test_preset_save_load_roundtrip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let preset_path = temp_dir.path().join("test_preset.json");

    let original = PresetDocument::new()
        .with_name("Roundtrip Test")
        .with_input_gain(0.9)
        .with_effect(
            EffectEntry::new("echo")
                .with_param("Delay Time", 300.0)
                .with_param("Feedback", 55.0),
        )
        .with_effect(EffectEntry::new("phaser").with_enabled(false));

    original.save(&preset_path).expect("should save preset");

    let loaded = PresetDocument::load(&preset_path).expect("should load preset");
    assert_eq!(loaded, original);
}

/// Test that saving creates missing parent directories.
#[test]
fn test_save_creates_parent_dirs() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let nested_path = temp_dir.path().join("presets").join("user").join("deep.json");

    let preset = PresetDocument::new()
        .with_name("Deep")
        .with_effect(EffectEntry::new("flanger"));

    preset.save(&nested_path).expect("should create parent dirs and save");
    assert!(nested_path.exists());

    let loaded = PresetDocument::load(&nested_path).expect("should load from nested path");
    assert_eq!(loaded.name.as_deref(), Some("Deep"));
}

/// Test loading a missing file reports the path.
#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let missing = temp_dir.path().join("does_not_exist.json");

    let result = PresetDocument::load(&missing);
    match result {
        Err(PresetError::ReadFile { path, .. }) => {
            assert!(path.ends_with("does_not_exist.json"), "error should name the file: {path:?}");
        }
        other => panic!("expected ReadFile error, got {other:?}"),
    }
}

/// Test loading a file with invalid JSON reports a parse error.
#[test]
fn test_load_malformed_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let bad_path = temp_dir.path().join("broken.json");
    std::fs::write(&bad_path, "{ not json").expect("should write file");

    let result = PresetDocument::load(&bad_path);
    assert!(matches!(result, Err(PresetError::Parse(_))));
}

/// Test loading a future version from disk is refused.
#[test]
fn test_load_future_version_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("future.json");
    std::fs::write(&path, r#"{"version": 3, "effects": []}"#).expect("should write file");

    let result = PresetDocument::load(&path);
    assert!(matches!(result, Err(PresetError::UnsupportedVersion { found: 3 })));
}

/// Test factory presets survive a save/load cycle unchanged.
#[test]
fn test_factory_presets_roundtrip_through_disk() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    for (i, preset) in factory_presets().into_iter().enumerate() {
        let path = temp_dir.path().join(format!("factory_{i}.json"));
        preset.save(&path).expect("should save factory preset");

        let loaded = PresetDocument::load(&path).expect("should load factory preset");
        assert_eq!(
            loaded, preset,
            "factory preset {:?} should roundtrip",
            preset.name
        );
    }
}

/// Test an effect type this build doesn't know survives a disk roundtrip.
#[test]
fn test_unknown_effect_survives_disk_roundtrip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("forward_compat.json");

    let preset = PresetDocument::new()
        .with_name("From The Future")
        .with_effect(EffectEntry::new("spectral_freeze").with_param("Bins", 512.0))
        .with_effect(EffectEntry::new("echo").with_param("Mix", 30.0));

    preset.save(&path).expect("should save");
    let loaded = PresetDocument::load(&path).expect("should load");

    assert_eq!(loaded.effect_types(), vec!["spectral_freeze", "echo"]);
    assert_eq!(loaded.get(0).unwrap().param("Bins"), Some(512.0));
}

/// Test a hand-edited preset with sparse fields loads with defaults filled in.
#[test]
fn test_hand_edited_minimal_preset() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("minimal.json");
    std::fs::write(
        &path,
        r#"{
    "version": 1,
    "effects": [
        { "effectType": "exciter" }
    ]
}"#,
    )
    .expect("should write file");

    let preset = PresetDocument::load(&path).expect("should load minimal preset");
    assert_eq!(preset.input_gain, 1.0);
    assert_eq!(preset.output_gain, 1.0);
    assert!(preset.get(0).unwrap().enabled);
    assert!(preset.get(0).unwrap().params.is_empty());
}

/// Test getting a factory preset and saving a tweaked copy.
#[test]
fn test_tweak_factory_preset() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("my_slapback.json");

    let mut preset = get_factory_preset("slapback").expect("slapback should exist");
    preset.name = Some("My Slapback".to_string());
    if let Some(echo) = preset.get_mut(0) {
        echo.set_param("Mix", 50.0);
    }

    preset.save(&path).expect("should save tweaked preset");

    let loaded = PresetDocument::load(&path).expect("should load tweaked preset");
    assert_eq!(loaded.name.as_deref(), Some("My Slapback"));
    assert_eq!(loaded.get(0).unwrap().param("Mix"), Some(50.0));
}
