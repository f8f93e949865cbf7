//! Virtual eyewear try-on: landmark-driven overlay placement for live video.
//!
//! Given the normalised face-mesh landmarks an external detection engine
//! reports for each frame, this library:
//! 1. Estimates an approximate head rotation (pitch, yaw, roll) with a
//!    cheap screen-space heuristic
//! 2. Places an eyewear image between the inner eye corners, sized from
//!    the eye distance and the user's size slider
//! 3. Composites the frame and the rotated, foreshortened, alpha-blended
//!    overlay into an output raster
//!
//! Detection and capture stay outside the crate behind the
//! [`session::DetectionEngine`] and [`session::FrameSource`] traits.
//!
//! # Examples
//!
//! ## Single frame
//!
//! ```no_run
//! use virtual_tryon::{
//!     asset::OverlayAsset,
//!     canvas::Canvas,
//!     compositor::OverlayCompositor,
//!     landmarks::{FrameDimensions, Landmark, LandmarkSet},
//!     placement::UserAdjustment,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let asset = OverlayAsset::load("assets/glass.png")?;
//! let mut compositor = OverlayCompositor::new(asset);
//! let mut canvas = Canvas::new(FrameDimensions::new(640, 480));
//!
//! let frame = image::open("frame.png")?.to_rgba8();
//! let landmarks = LandmarkSet::new(vec![Landmark::new(0.5, 0.5); 468]);
//!
//! let outcome = compositor.composite(&mut canvas, &frame, Some(&landmarks), UserAdjustment::new(110, 80));
//! if let Some(placement) = outcome.placement() {
//!     println!("Overlay at ({:.1}, {:.1}), {:.1} px wide", placement.center_x, placement.center_y, placement.width);
//! }
//! canvas.surface().save("composited.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Camera session
//!
//! ```no_run
//! use virtual_tryon::{
//!     config::Config,
//!     replay::{ImageSequenceSource, RecordedLandmarks},
//!     session::Session,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut session = Session::from_config(
//!     ImageSequenceSource::new("recording/frames"),
//!     RecordedLandmarks::from_file("recording/landmarks.yaml"),
//!     &config,
//! )?;
//!
//! // The UI keeps a handle to the sliders
//! let sliders = session.adjustment();
//! sliders.set_alpha_percent(60);
//!
//! session.start()?;
//! while let Some(report) = session.step()? {
//!     if let Some(rotation) = session.rotation() {
//!         println!("frame {}: yaw {:.1}", report.index, rotation.yaw);
//!     }
//! }
//! session.capture(".")?;
//! # Ok(())
//! # }
//! ```

/// Landmark, landmark set and frame dimension types
pub mod landmarks;

/// Head rotation heuristic
pub mod pose_estimation;

/// Overlay placement geometry and user adjustment
pub mod placement;

/// Eyewear image asset
pub mod asset;

/// Output raster surface with drawing-state stack
pub mod canvas;

/// Per-frame compositing
pub mod compositor;

/// Camera session lifecycle and frame loop
pub mod session;

/// File-backed frame source and detection engine
pub mod replay;

/// Utility functions for pixel conversions and frame handling
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the crate
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
