//! Camera session: lifecycle of the capture driver and detection engine,
//! and the pull-based frame loop feeding the compositor.
//!
//! ```text
//! Idle --start()--> Starting --first frame--> Running
//!   ^                   |                        |
//!   +------ stop() / end of stream / failure ----+
//! ```

use crate::{
    asset::OverlayAsset,
    canvas::Canvas,
    compositor::{FrameOutcome, OverlayCompositor},
    config::Config,
    landmarks::{FrameDimensions, LandmarkSet},
    placement::{BoundingBox, OverlayPlacement, SharedAdjustment},
    pose_estimation::HeadRotation,
    utils::image_conversion::mirror_frame,
    Error, Result,
};
use image::{ImageFormat, RgbaImage};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Options recognised by the detection engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorOptions {
    /// Maximum number of faces (only 1 is supported)
    pub max_faces: usize,
    /// Refine eye and lip landmarks
    pub refine_landmarks: bool,
    /// Minimum detection confidence (0.0-1.0)
    pub min_detection_confidence: f32,
    /// Minimum tracking confidence (0.0-1.0)
    pub min_tracking_confidence: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            max_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl DetectorOptions {
    /// Check option ranges
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a face count other than 1 or a
    /// confidence outside 0.0-1.0.
    pub fn validate(&self) -> Result<()> {
        if self.max_faces != 1 {
            return Err(Error::InvalidInput(format!(
                "Only single-face tracking is supported, got max_faces = {}",
                self.max_faces
            )));
        }
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidInput(format!("{name} must be between 0.0 and 1.0, got {value}")));
            }
        }
        Ok(())
    }
}

/// External face-mesh landmark engine
pub trait DetectionEngine {
    /// Prepare the engine; failure leaves the session "not ready"
    fn initialize(&mut self, options: &DetectorOptions) -> Result<()>;

    /// Analyse one frame, returning one landmark set per detected face
    fn submit_frame(&mut self, frame: &RgbaImage) -> Result<Vec<LandmarkSet>>;

    /// Free engine resources; no results may be produced afterwards
    fn release(&mut self);
}

/// External video capture driver
pub trait FrameSource {
    /// Acquire the stream
    fn start(&mut self) -> Result<()>;

    /// Next captured frame, `None` once the stream has ended
    fn next_frame(&mut self) -> Result<Option<RgbaImage>>;

    /// Stop requesting frames and release the stream
    fn stop(&mut self);
}

/// Camera lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No stream, no engine
    Idle,
    /// Stream and engine acquired, waiting for the first frame
    Starting,
    /// Frames are being composited
    Running,
}

/// Summary of one processed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Zero-based frame counter within the session
    pub index: u64,
    /// Number of faces the engine reported
    pub faces: usize,
    /// What was drawn
    pub outcome: FrameOutcome,
}

/// Owns the capture driver, detection engine, compositor and output surface
pub struct Session<S: FrameSource, D: DetectionEngine> {
    source: S,
    engine: D,
    compositor: OverlayCompositor,
    canvas: Canvas,
    adjustment: SharedAdjustment,
    options: DetectorOptions,
    mirror: bool,
    capture_file_name: String,
    state: SessionState,
    detection_unavailable: Option<String>,
    frame_index: u64,
}

impl<S: FrameSource, D: DetectionEngine> Session<S, D> {
    /// Create an idle session drawing into a surface of `dims`
    pub fn new(source: S, engine: D, compositor: OverlayCompositor, dims: FrameDimensions) -> Self {
        Self {
            source,
            engine,
            compositor,
            canvas: Canvas::new(dims),
            adjustment: SharedAdjustment::default(),
            options: DetectorOptions::default(),
            mirror: false,
            capture_file_name: crate::constants::DEFAULT_CAPTURE_FILE_NAME.to_string(),
            state: SessionState::Idle,
            detection_unavailable: None,
            frame_index: 0,
        }
    }

    /// Create an idle session from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn from_config(source: S, engine: D, config: &Config) -> Result<Self> {
        config.validate()?;

        let asset = OverlayAsset::load_or_placeholder(&config.overlay.asset);
        let compositor = OverlayCompositor::with_width_factor(asset, config.overlay.width_factor);

        let mut session = Self::new(source, engine, compositor, config.frame_dimensions())
            .with_options(config.detector_options())
            .with_mirror(config.display.mirror);
        session.adjustment.set(config.initial_adjustment());
        session.capture_file_name.clone_from(&config.capture.file_name);

        Ok(session)
    }

    /// Set detection engine options
    #[must_use]
    pub fn with_options(mut self, options: DetectorOptions) -> Self {
        self.options = options;
        self
    }

    /// Mirror frames horizontally before analysis
    #[must_use]
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while the session is starting or running
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// Reason the detection engine is not ready, if initialisation failed
    #[must_use]
    pub fn detection_unavailable(&self) -> Option<&str> {
        self.detection_unavailable.as_deref()
    }

    /// Allow another initialisation attempt after a detection failure
    pub fn reset_detection(&mut self) {
        self.detection_unavailable = None;
    }

    /// Handle shared with the UI for the size and transparency sliders
    #[must_use]
    pub fn adjustment(&self) -> SharedAdjustment {
        self.adjustment.clone()
    }

    /// Rotation of the last overlaid frame
    #[must_use]
    pub fn rotation(&self) -> Option<HeadRotation> {
        self.compositor.last_rotation()
    }

    /// Placement of the last overlaid frame
    #[must_use]
    pub fn placement(&self) -> Option<OverlayPlacement> {
        self.compositor.last_placement()
    }

    /// Approximate overlay bounds of the last overlaid frame
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.compositor.last_bounds()
    }

    /// Current output raster
    #[must_use]
    pub fn output(&self) -> &RgbaImage {
        self.canvas.surface()
    }

    /// Image draws issued for the current output
    #[must_use]
    pub fn output_draws(&self) -> usize {
        self.canvas.image_draws()
    }

    /// Acquire the stream and initialise the detection engine.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is already open
    /// - A previous initialisation failed (`Error::DetectionUnavailable`)
    /// - The options are invalid
    /// - The engine fails to initialise (`Error::DetectionUnavailable`)
    /// - The stream cannot be acquired (`Error::StreamAcquisition`)
    pub fn start(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::SessionState(format!("cannot start from {:?}", self.state)));
        }
        if let Some(reason) = &self.detection_unavailable {
            return Err(Error::DetectionUnavailable(reason.clone()));
        }
        self.options.validate()?;

        info!("Starting camera session");
        self.state = SessionState::Starting;

        if let Err(e) = self.engine.initialize(&self.options) {
            warn!("Detection engine failed to initialise: {e}");
            self.state = SessionState::Idle;
            let reason = match e {
                Error::DetectionUnavailable(reason) => reason,
                other => other.to_string(),
            };
            self.detection_unavailable = Some(reason.clone());
            return Err(Error::DetectionUnavailable(reason));
        }

        if let Err(e) = self.source.start() {
            warn!("Video stream could not be acquired: {e}");
            self.engine.release();
            self.state = SessionState::Idle;
            return Err(match e {
                Error::StreamAcquisition(reason) => Error::StreamAcquisition(reason),
                other => Error::StreamAcquisition(other.to_string()),
            });
        }

        self.frame_index = 0;
        self.compositor.clear_telemetry();
        Ok(())
    }

    /// Tear down: stop the stream, release the engine and return to `Idle`.
    ///
    /// Idempotent.
    pub fn stop(&mut self) {
        if !self.is_open() {
            return;
        }
        info!("Stopping camera session after {} frames", self.frame_index);
        self.state = SessionState::Idle;
        self.source.stop();
        self.engine.release();
    }

    /// Pull, analyse and composite the next frame.
    ///
    /// Returns `Ok(None)` when the session is idle or the stream ended.
    ///
    /// # Errors
    ///
    /// A capture or engine failure tears the session down and is returned.
    pub fn step(&mut self) -> Result<Option<FrameReport>> {
        if !self.is_open() {
            return Ok(None);
        }

        let mut frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("Video stream ended");
                self.stop();
                return Ok(None);
            }
            Err(e) => {
                warn!("Video stream failed: {e}");
                self.stop();
                return Err(e);
            }
        };

        if self.mirror {
            mirror_frame(&mut frame);
        }

        let faces = match self.engine.submit_frame(&frame) {
            Ok(faces) => faces,
            Err(e) => {
                warn!("Detection engine failed: {e}");
                self.stop();
                return Err(e);
            }
        };

        Ok(self.on_result(&frame, &faces))
    }

    /// Composite an analysed frame delivered by the engine.
    ///
    /// Results arriving after teardown are dropped without touching the
    /// output surface.
    pub fn on_result(&mut self, frame: &RgbaImage, faces: &[LandmarkSet]) -> Option<FrameReport> {
        if !self.is_open() {
            debug!("Dropping result delivered after teardown");
            return None;
        }
        if self.state == SessionState::Starting {
            info!("First frame received, session running");
            self.state = SessionState::Running;
        }

        let adjustment = self.adjustment.snapshot();
        let outcome = self
            .compositor
            .composite(&mut self.canvas, frame, faces.first(), adjustment);

        let report = FrameReport {
            index: self.frame_index,
            faces: faces.len(),
            outcome,
        };
        self.frame_index += 1;
        Some(report)
    }

    /// Lazy sequence of processed frames; ends when the session goes idle
    pub fn frames(&mut self) -> Frames<'_, S, D> {
        Frames { session: self }
    }

    /// Save the current output as PNG under `dir` using the configured file name
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn capture<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.capture_file_name);
        self.capture_to(&path)?;
        Ok(path)
    }

    /// Save the current output as PNG at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn capture_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.canvas.surface().save_with_format(&path, ImageFormat::Png)?;
        info!("Captured output to {}", path.as_ref().display());
        Ok(())
    }
}

impl<S: FrameSource, D: DetectionEngine> Drop for Session<S, D> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Iterator over processed frames of an open session
pub struct Frames<'a, S: FrameSource, D: DetectionEngine> {
    session: &'a mut Session<S, D>,
}

impl<S: FrameSource, D: DetectionEngine> Iterator for Frames<'_, S, D> {
    type Item = Result<FrameReport>;

    fn next(&mut self) -> Option<Self::Item> {
        self.session.step().transpose()
    }
}
