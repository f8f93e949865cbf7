//! Overlay placement geometry: where, how large and how rotated the
//! eyewear image is drawn for one frame.

use crate::{
    constants::{
        landmark_index::{LEFT_EYE_INNER, RIGHT_EYE_INNER},
        ALPHA_PERCENT_MAX, ALPHA_PERCENT_MIN, SIZE_PERCENT_MAX, SIZE_PERCENT_MIN,
    },
    landmarks::{FrameDimensions, LandmarkSet},
    pose_estimation::HeadRotation,
    Error, Result,
};
use nalgebra::{center, distance};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

/// User-controlled size and transparency sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAdjustment {
    /// Overlay size in percent of the fitted width (70-140)
    pub size_percent: u32,
    /// Overlay opacity in percent (30-100)
    pub alpha_percent: u32,
}

impl UserAdjustment {
    /// Create an adjustment, clamping both sliders to their ranges
    #[must_use]
    pub fn new(size_percent: u32, alpha_percent: u32) -> Self {
        Self {
            size_percent: size_percent.clamp(SIZE_PERCENT_MIN, SIZE_PERCENT_MAX),
            alpha_percent: alpha_percent.clamp(ALPHA_PERCENT_MIN, ALPHA_PERCENT_MAX),
        }
    }

    /// Width multiplier derived from the size slider
    #[must_use]
    pub fn size_factor(&self) -> f64 {
        f64::from(self.size_percent) / 100.0
    }

    /// Global draw opacity derived from the transparency slider
    #[must_use]
    pub fn opacity(&self) -> f64 {
        f64::from(self.alpha_percent) / 100.0
    }
}

impl Default for UserAdjustment {
    fn default() -> Self {
        Self::new(100, 100)
    }
}

/// Adjustment handle shared between the UI path and the frame path.
///
/// Each slider is stored independently; a reader may observe a size from
/// one write and an alpha from another.
#[derive(Debug, Clone)]
pub struct SharedAdjustment {
    size_percent: Arc<AtomicU32>,
    alpha_percent: Arc<AtomicU32>,
}

impl SharedAdjustment {
    /// Create a shared handle holding `initial`
    #[must_use]
    pub fn new(initial: UserAdjustment) -> Self {
        Self {
            size_percent: Arc::new(AtomicU32::new(initial.size_percent)),
            alpha_percent: Arc::new(AtomicU32::new(initial.alpha_percent)),
        }
    }

    /// Set the size slider (clamped to 70-140)
    pub fn set_size_percent(&self, value: u32) {
        self.size_percent
            .store(value.clamp(SIZE_PERCENT_MIN, SIZE_PERCENT_MAX), Ordering::Relaxed);
    }

    /// Set the transparency slider (clamped to 30-100)
    pub fn set_alpha_percent(&self, value: u32) {
        self.alpha_percent
            .store(value.clamp(ALPHA_PERCENT_MIN, ALPHA_PERCENT_MAX), Ordering::Relaxed);
    }

    /// Replace both sliders
    pub fn set(&self, adjustment: UserAdjustment) {
        self.set_size_percent(adjustment.size_percent);
        self.set_alpha_percent(adjustment.alpha_percent);
    }

    /// Read the current slider values
    #[must_use]
    pub fn snapshot(&self) -> UserAdjustment {
        UserAdjustment {
            size_percent: self.size_percent.load(Ordering::Relaxed),
            alpha_percent: self.alpha_percent.load(Ordering::Relaxed),
        }
    }
}

impl Default for SharedAdjustment {
    fn default() -> Self {
        Self::new(UserAdjustment::default())
    }
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// True when `(px, py)` lies inside the box
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Affine description of the overlay for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    /// Placement center, x (midpoint of the inner eye corners)
    pub center_x: f64,
    /// Placement center, y
    pub center_y: f64,
    /// Drawn width before rotation and foreshortening
    pub width: f64,
    /// Drawn height before rotation and foreshortening
    pub height: f64,
    /// In-plane rotation around the center
    pub rotation_radians: f64,
    /// Horizontal foreshortening, `|cos(yaw)|`
    pub x_scale_factor: f64,
    /// Vertical foreshortening, `cos(pitch)`
    pub y_scale_factor: f64,
}

impl OverlayPlacement {
    /// Pre-rotation rectangle centered on the placement.
    ///
    /// The rendered silhouette is rotated and foreshortened, so this is
    /// only an approximation of the covered area.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            x: self.center_x - self.width / 2.0,
            y: self.center_y - self.height / 2.0,
            width: self.width,
            height: self.height,
        }
    }
}

/// Compute the overlay placement from the eye corners and head rotation.
///
/// `aspect_ratio` is the asset's height / width; `width_factor` relates the
/// inner eye-corner distance to the overlay width.
///
/// # Errors
///
/// Returns `Error::MalformedLandmarks` if an eye corner is missing or
/// non-finite, and `Error::InvalidInput` if the ratios are unusable.
pub fn compute_placement(
    landmarks: &LandmarkSet,
    dims: FrameDimensions,
    rotation: &HeadRotation,
    adjustment: UserAdjustment,
    aspect_ratio: f64,
    width_factor: f64,
) -> Result<OverlayPlacement> {
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return Err(Error::InvalidInput(format!("Invalid overlay aspect ratio: {aspect_ratio}")));
    }
    if !(width_factor.is_finite() && width_factor > 0.0) {
        return Err(Error::InvalidInput(format!("Invalid overlay width factor: {width_factor}")));
    }

    let left_eye = landmarks.pixel(LEFT_EYE_INNER, dims)?;
    let right_eye = landmarks.pixel(RIGHT_EYE_INNER, dims)?;

    let eye_distance = distance(&left_eye, &right_eye);
    let width = eye_distance * width_factor * adjustment.size_factor();
    let height = width * aspect_ratio;
    let mid = center(&left_eye, &right_eye);

    Ok(OverlayPlacement {
        center_x: mid.x,
        center_y: mid.y,
        width,
        height,
        rotation_radians: rotation.roll.to_radians(),
        x_scale_factor: rotation.yaw.to_radians().cos().abs(),
        y_scale_factor: rotation.pitch.to_radians().cos(),
    })
}
