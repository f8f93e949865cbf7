//! Configuration loading, saving and validation

use std::path::PathBuf;
use virtual_tryon::{
    config::{Config, EXAMPLE_CONFIG},
    landmarks::FrameDimensions,
    placement::UserAdjustment,
    Error,
};

#[test]
fn test_example_config_parses() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    config.validate().unwrap();

    assert_eq!(config.frame_dimensions(), FrameDimensions::new(640, 480));
    assert_eq!(config.overlay.asset, PathBuf::from("assets/glass.png"));
    assert_eq!(config.initial_adjustment(), UserAdjustment::default());
    assert_eq!(config.capture.file_name, "tryon-with-glasses.png");
    assert!(config.display.mirror);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = Config::from_yaml("overlay:\n  alpha_percent: 40\n").unwrap();

    assert_eq!(config.overlay.alpha_percent, 40);
    assert_eq!(config.overlay.size_percent, 100);
    assert_eq!(config.display.width, 640);
    assert_eq!(config.detector_options().max_faces, 1);
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("virtual_tryon_config_{}.yaml", std::process::id()));
    let mut config = Config::default();
    config.display.mirror = false;
    config.overlay.size_percent = 125;

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert!(!loaded.display.mirror);
    assert_eq!(loaded.overlay.size_percent, 125);
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(
        Config::from_file("does/not/exist.yaml"),
        Err(Error::IoError(_))
    ));
}

#[test]
fn test_malformed_yaml_is_config_error() {
    assert!(matches!(
        Config::from_yaml("display: [not, a, map"),
        Err(Error::ConfigError(_))
    ));
}

#[test]
fn test_validation_rejects_out_of_range_values() {
    let cases: Vec<fn(&mut Config)> = vec![
        |c| c.detector.max_faces = 2,
        |c| c.detector.min_detection_confidence = 1.5,
        |c| c.detector.min_tracking_confidence = -0.1,
        |c| c.display.width = 0,
        |c| c.overlay.size_percent = 69,
        |c| c.overlay.size_percent = 141,
        |c| c.overlay.alpha_percent = 29,
        |c| c.overlay.width_factor = 0.0,
        |c| c.overlay.width_factor = f64::NAN,
        |c| c.capture.file_name = "  ".to_string(),
    ];

    for (i, mutate) in cases.into_iter().enumerate() {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(Error::ConfigError(_))),
            "case {i} should be rejected"
        );
    }
}

#[test]
fn test_slider_bounds_accepted() {
    let mut config = Config::default();
    for (size, alpha) in [(70, 30), (140, 100)] {
        config.overlay.size_percent = size;
        config.overlay.alpha_percent = alpha;
        assert!(config.validate().is_ok());
    }
}
