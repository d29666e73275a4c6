//! Parameterised DeviceConfig parsing and threshold tests.

use rstest::rstest;
use shusher_core::types::THRESHOLD_DISABLED;
use shusher_core::{calculate, DeviceConfig};

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn full_document_roundtrips() {
    let json = r#"{
        "mac_address": "aa:bb:cc:dd:ee:ff",
        "sound_threshold": 75,
        "min_threshold": 30,
        "max_threshold": 110,
        "decay": 0.25,
        "filename": "shush",
        "cooldown": 60,
        "poll_interval": 15,
        "input_device": "alsa:hw0",
        "output_device": "alsa:hw1"
    }"#;

    let cfg: DeviceConfig = serde_json::from_str(json).expect("parse");
    assert_eq!(cfg.mac_address.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
    assert_eq!(cfg.sound_threshold, Some(75));
    assert_eq!(cfg.decay, Some(0.25));
    assert_eq!(cfg.filename.as_deref(), Some("shush"));
    assert_eq!(cfg.poll_interval, 15);

    let reserialized = serde_json::to_string(&cfg).expect("serialize");
    let reparsed: DeviceConfig = serde_json::from_str(&reserialized).expect("reparse");
    assert_eq!(cfg, reparsed);
}

#[test]
fn absent_fields_stay_absent_after_roundtrip() {
    let cfg: DeviceConfig = serde_json::from_str(r#"{"poll_interval": 10}"#).expect("parse");
    let json = serde_json::to_string(&cfg).expect("serialize");
    assert!(
        !json.contains("decay") && !json.contains("cooldown"),
        "absent optionals must not be serialized: {json}"
    );
}

#[rstest]
#[case(r#"{}"#)]
#[case(r#"{"poll_interval": "soon"}"#)]
#[case(r#"{"poll_interval": 10, "sound_threshold": "loud"}"#)]
#[case(r#"not json"#)]
fn malformed_documents_are_rejected(#[case] body: &str) {
    assert!(serde_json::from_str::<DeviceConfig>(body).is_err());
}

// ---------------------------------------------------------------------------
// Threshold interpolation grid
// ---------------------------------------------------------------------------

#[rstest]
#[case(0, 40, 120, 40)]
#[case(50, 40, 120, 80)]
#[case(100, 40, 120, 120)]
#[case(25, 0, 100, 25)]
#[case(10, 60, 60, 60)]
fn interpolation_cases(
    #[case] sound: i64,
    #[case] min: i64,
    #[case] max: i64,
    #[case] expected: i64,
) {
    assert_eq!(calculate(sound, min, max), expected);
}

#[rstest]
#[case(-1)]
#[case(-5)]
#[case(i64::MIN)]
fn negative_sensitivity_disables(#[case] sound: i64) {
    assert_eq!(calculate(sound, 40, 120), THRESHOLD_DISABLED);
    assert_eq!(calculate(sound, 0, 1_000), THRESHOLD_DISABLED);
}
