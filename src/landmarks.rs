//! Landmark data delivered by the external face-mesh detection engine.
//!
//! Coordinates are normalised to the analysed frame: `x` and `y` lie in
//! `[0, 1]` relative to frame width and height, `z` is an uncalibrated
//! relative depth. Index meaning follows the engine's topology, see
//! [`crate::constants::landmark_index`].

use crate::{Error, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A single normalised face-surface point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, fraction of frame width
    pub x: f32,
    /// Vertical position, fraction of frame height
    pub y: f32,
    /// Relative depth, when the engine provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    /// Create a 2D landmark
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    /// Create a landmark with depth
    #[must_use]
    pub fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z: Some(z) }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f32::is_finite)
    }
}

/// Width × height of the destination raster surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl FrameDimensions {
    /// Create frame dimensions
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as a float, for coordinate math
    #[must_use]
    pub fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    /// Height as a float, for coordinate math
    #[must_use]
    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }
}

/// All landmarks of one detected face in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Wrap the engine's ordered landmark sequence
    #[must_use]
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Number of landmarks
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the set holds no landmarks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All landmarks in topology order
    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Landmark at `index`, without validation
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Landmark at `index`, rejecting missing indices and non-finite values
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedLandmarks` if the index is out of range or
    /// any coordinate of the landmark is NaN or infinite.
    pub fn landmark(&self, index: usize) -> Result<&Landmark> {
        let landmark = self.points.get(index).ok_or_else(|| {
            Error::MalformedLandmarks(format!("landmark {index} missing from set of {}", self.points.len()))
        })?;

        if !landmark.is_finite() {
            return Err(Error::MalformedLandmarks(format!("landmark {index} has non-finite coordinates")));
        }

        Ok(landmark)
    }

    /// Horizontal pixel coordinate of landmark `index`
    ///
    /// # Errors
    ///
    /// See [`LandmarkSet::landmark`].
    pub fn pixel_x(&self, index: usize, dims: FrameDimensions) -> Result<f64> {
        Ok(f64::from(self.landmark(index)?.x) * dims.width_f64())
    }

    /// Pixel coordinates of landmark `index`
    ///
    /// # Errors
    ///
    /// See [`LandmarkSet::landmark`].
    pub fn pixel(&self, index: usize, dims: FrameDimensions) -> Result<Point2<f64>> {
        let landmark = self.landmark(index)?;
        Ok(Point2::new(
            f64::from(landmark.x) * dims.width_f64(),
            f64::from(landmark.y) * dims.height_f64(),
        ))
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}
