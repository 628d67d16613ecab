//! # Configuration Tests
//!
//! Defaults, JSON deserialization, file loading and validation.

use std::io::Write;

use dutcheck_core::HarnessError;
use dutcheck_core::config::*;
use pretty_assertions::assert_eq;

#[test]
fn test_config_default() {
    let config = HarnessConfig::default();
    assert_eq!(config.stimulus.count, 64);
    assert_eq!(config.stimulus.seed, 1);
    assert_eq!(config.stimulus.valid, ValidDistribution::Always);
    assert_eq!(config.stimulus.data, DataDistribution::Uniform);
    assert_eq!(config.dut.depth, 256);
    assert!(config.validate().is_ok());
}

#[test]
fn test_scoreboard_defaults() {
    let sb = ScoreboardConfig::default();
    assert_eq!(sb.model, ModelKind::CircularBuffer { depth: 256 });
    assert_eq!(sb.expected_latency_ticks, 1);
    assert_eq!(sb.latency_tolerance_ticks, 0);
    assert!(sb.enforce_response_deadline);
    assert_eq!(sb.drain_timeout_ticks, None);
    assert_eq!(sb.drain_timeout(), 4);
    assert_eq!(sb.response_window(), Some(1));
}

#[test]
fn test_drain_timeout_scales_with_latency() {
    let sb = ScoreboardConfig {
        expected_latency_ticks: 3,
        ..ScoreboardConfig::default()
    };
    assert_eq!(sb.drain_timeout(), 12);
}

#[test]
fn test_response_window_disabled() {
    let sb = ScoreboardConfig {
        enforce_response_deadline: false,
        ..ScoreboardConfig::default()
    };
    assert_eq!(sb.response_window(), None);
}

#[test]
fn test_empty_json_is_default() {
    let config = HarnessConfig::from_json_str("{}").unwrap();
    assert_eq!(config, HarnessConfig::default());
}

#[test]
fn test_json_overrides() {
    let json = r#"{
        "stimulus": { "count": 10, "seed": 99, "data": { "Sequential": { "start": 1, "step": 2 } } },
        "dut": { "depth": 16 },
        "scoreboard": {
            "model": "IdentityEcho",
            "latency_tolerance_ticks": 2,
            "enforce_response_deadline": false
        }
    }"#;
    let config = HarnessConfig::from_json_str(json).unwrap();
    assert_eq!(config.stimulus.count, 10);
    assert_eq!(config.stimulus.seed, 99);
    assert_eq!(
        config.stimulus.data,
        DataDistribution::Sequential { start: 1, step: 2 }
    );
    assert_eq!(config.dut.depth, 16);
    assert_eq!(config.scoreboard.model, ModelKind::IdentityEcho);
    assert_eq!(config.scoreboard.latency_tolerance_ticks, 2);
    assert!(!config.scoreboard.enforce_response_deadline);
}

#[test]
fn test_round_trip_through_json() {
    let mut config = HarnessConfig::default();
    config.stimulus.valid = ValidDistribution::Bernoulli { percent: 75 };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(HarnessConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_malformed_json() {
    let err = HarnessConfig::from_json_str("{ \"stimulus\": ").unwrap_err();
    assert!(matches!(err, HarnessError::Json(_)));
}

#[test]
fn test_zero_count_rejected() {
    let err = HarnessConfig::from_json_str(r#"{ "stimulus": { "count": 0 } }"#).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
}

#[test]
fn test_percent_over_100_rejected() {
    let json = r#"{ "stimulus": { "valid": { "Bernoulli": { "percent": 101 } } } }"#;
    let err = HarnessConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
}

#[test]
fn test_zero_depth_rejected() {
    let err = HarnessConfig::from_json_str(r#"{ "dut": { "depth": 0 } }"#).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));

    let json = r#"{ "scoreboard": { "model": { "CircularBuffer": { "depth": 0 } } } }"#;
    let err = HarnessConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
}

#[test]
fn test_zero_timing_rejected() {
    let err = HarnessConfig::from_json_str(r#"{ "scoreboard": { "expected_latency_ticks": 0 } }"#)
        .unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));

    let err = HarnessConfig::from_json_str(r#"{ "scoreboard": { "drain_timeout_ticks": 0 } }"#)
        .unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
}

#[test]
fn test_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "stimulus": {{ "count": 5, "seed": 7 }} }}"#).unwrap();
    let config = HarnessConfig::from_path(file.path()).unwrap();
    assert_eq!(config.stimulus.count, 5);
    assert_eq!(config.stimulus.seed, 7);
}

#[test]
fn test_from_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = HarnessConfig::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, HarnessError::Io(_)));
}

#[test]
fn test_model_depth_must_match_dut() {
    let err = HarnessConfig::from_json_str(r#"{ "dut": { "depth": 16 } }"#).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));

    let json = r#"{
        "dut": { "depth": 16 },
        "scoreboard": { "model": { "CircularBuffer": { "depth": 16 } } }
    }"#;
    let config = HarnessConfig::from_json_str(json).unwrap();
    assert_eq!(config.scoreboard.model, ModelKind::CircularBuffer { depth: 16 });
}

#[test]
fn test_identity_model_ignores_dut_depth() {
    let json = r#"{ "dut": { "depth": 8 }, "scoreboard": { "model": "IdentityEcho" } }"#;
    assert!(HarnessConfig::from_json_str(json).is_ok());
}
