//! Configuration management for the virtual try-on pipeline

use crate::{
    constants::{
        ALPHA_PERCENT_MAX, ALPHA_PERCENT_MIN, DEFAULT_CAPTURE_FILE_NAME, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH,
        DEFAULT_WIDTH_FACTOR, SIZE_PERCENT_MAX, SIZE_PERCENT_MIN,
    },
    landmarks::FrameDimensions,
    placement::UserAdjustment,
    session::DetectorOptions,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Landmark detection engine options
    pub detector: DetectorConfig,

    /// Output surface configuration
    pub display: DisplayConfig,

    /// Overlay asset and initial adjustment
    pub overlay: OverlayConfig,

    /// Capture (snapshot) configuration
    pub capture: CaptureConfig,
}

/// Options handed to the detection engine on initialisation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum number of faces to track (only 1 is supported)
    pub max_faces: usize,

    /// Ask the engine for refined eye/lip landmarks
    pub refine_landmarks: bool,

    /// Minimum detection confidence (0.0-1.0)
    pub min_detection_confidence: f32,

    /// Minimum tracking confidence (0.0-1.0)
    pub min_tracking_confidence: f32,
}

/// Output surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Surface width in pixels
    pub width: u32,

    /// Surface height in pixels
    pub height: u32,

    /// Mirror frames horizontally (selfie view)
    pub mirror: bool,
}

/// Overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Path to the eyeglasses image (RGBA PNG)
    pub asset: PathBuf,

    /// Initial size slider value (70-140)
    pub size_percent: u32,

    /// Initial transparency slider value (30-100)
    pub alpha_percent: u32,

    /// Overlay width relative to inner eye-corner distance
    pub width_factor: f64,
}

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// File name used for snapshots
    pub file_name: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            mirror: true,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            asset: PathBuf::from("assets/glass.png"),
            size_percent: 100,
            alpha_percent: 100,
            width_factor: DEFAULT_WIDTH_FACTOR,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_CAPTURE_FILE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Output surface dimensions
    #[must_use]
    pub fn frame_dimensions(&self) -> FrameDimensions {
        FrameDimensions::new(self.display.width, self.display.height)
    }

    /// Initial user adjustment taken from the overlay section
    #[must_use]
    pub fn initial_adjustment(&self) -> UserAdjustment {
        UserAdjustment::new(self.overlay.size_percent, self.overlay.alpha_percent)
    }

    /// Detection engine options
    #[must_use]
    pub fn detector_options(&self) -> DetectorOptions {
        DetectorOptions {
            max_faces: self.detector.max_faces,
            refine_landmarks: self.detector.refine_landmarks,
            min_detection_confidence: self.detector.min_detection_confidence,
            min_tracking_confidence: self.detector.min_tracking_confidence,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.detector.max_faces != 1 {
            return Err(Error::ConfigError(format!(
                "Only single-face tracking is supported, got max_faces = {}",
                self.detector.max_faces
            )));
        }
        if !(0.0..=1.0).contains(&self.detector.min_detection_confidence) {
            return Err(Error::ConfigError(
                "Minimum detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detector.min_tracking_confidence) {
            return Err(Error::ConfigError(
                "Minimum tracking confidence must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.display.width == 0 || self.display.height == 0 {
            return Err(Error::ConfigError("Display width and height must be greater than 0".to_string()));
        }

        if !(SIZE_PERCENT_MIN..=SIZE_PERCENT_MAX).contains(&self.overlay.size_percent) {
            return Err(Error::ConfigError(format!(
                "Size percent must be between {SIZE_PERCENT_MIN} and {SIZE_PERCENT_MAX}"
            )));
        }
        if !(ALPHA_PERCENT_MIN..=ALPHA_PERCENT_MAX).contains(&self.overlay.alpha_percent) {
            return Err(Error::ConfigError(format!(
                "Alpha percent must be between {ALPHA_PERCENT_MIN} and {ALPHA_PERCENT_MAX}"
            )));
        }
        if !(self.overlay.width_factor.is_finite() && self.overlay.width_factor > 0.0) {
            return Err(Error::ConfigError("Overlay width factor must be a positive number".to_string()));
        }

        if self.capture.file_name.trim().is_empty() {
            return Err(Error::ConfigError("Capture file name must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Virtual Try-On Configuration

# Landmark detection engine
detector:
  max_faces: 1
  refine_landmarks: true
  min_detection_confidence: 0.5
  min_tracking_confidence: 0.5

# Output surface
display:
  width: 640
  height: 480
  mirror: true

# Eyeglasses overlay
overlay:
  asset: "assets/glass.png"
  size_percent: 100
  alpha_percent: 100
  width_factor: 2.2

# Snapshots
capture:
  file_name: "tryon-with-glasses.png"
"#;
