//! End-to-end render + persist behavior.

use std::fs;

use tempfile::TempDir;

use shusher_core::{DeviceConfig, DeviceOverrides, ThresholdMode};
use shusher_render::{Renderer, WriteResult};

fn config(json: &str) -> DeviceConfig {
    serde_json::from_str(json).expect("config fixture")
}

#[test]
fn accepted_config_lands_complete_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shusherrc");
    let renderer = Renderer::new(DeviceOverrides::default(), ThresholdMode::Auto);

    let cfg = config(
        r#"{"poll_interval": 30, "decay": 0.2, "sound_threshold": 50,
            "min_threshold": 40, "max_threshold": 120, "filename": "shush"}"#,
    );
    let result = renderer.render_and_persist(&cfg, &path).expect("persist");
    assert!(matches!(result, WriteResult::Written { .. }));

    let on_disk = fs::read_to_string(&path).unwrap();
    assert_eq!(
        on_disk,
        "decay = 0.20\nthreshold = 80\nshush_file = \"shush.wav\"\n"
    );
}

#[test]
fn repersisting_equal_config_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shusherrc");
    let renderer = Renderer::new(DeviceOverrides::default(), ThresholdMode::Auto);

    let cfg = config(r#"{"poll_interval": 30, "cooldown": 60}"#);
    renderer.render_and_persist(&cfg, &path).expect("persist");
    let result = renderer.render_and_persist(&cfg, &path).expect("repersist");
    assert!(matches!(result, WriteResult::Unchanged { .. }));
}

#[test]
fn device_override_wins_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shusherrc");
    let renderer = Renderer::new(
        DeviceOverrides {
            input_device: Some("B".to_string()),
            output_device: None,
        },
        ThresholdMode::Auto,
    );

    let cfg = config(r#"{"poll_interval": 30, "input_device": "A"}"#);
    renderer.render_and_persist(&cfg, &path).expect("persist");

    let on_disk = fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("input_device = \"B\""));
    assert!(!on_disk.contains('A'));
}
