//! Per-frame overlay compositing.

use crate::{
    asset::OverlayAsset,
    canvas::Canvas,
    constants::DEFAULT_WIDTH_FACTOR,
    landmarks::LandmarkSet,
    placement::{compute_placement, BoundingBox, OverlayPlacement, UserAdjustment},
    pose_estimation::{HeadRotation, PoseEstimator},
};
use image::RgbaImage;
use log::debug;

/// What the compositor did with one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No face in the frame; the surface holds the raw frame only
    NoFace,
    /// A face was found but its eye corners were unusable; overlay omitted
    Skipped,
    /// Overlay drawn with this rotation and placement
    Overlaid {
        /// Rotation used for the draw
        rotation: HeadRotation,
        /// Placement used for the draw
        placement: OverlayPlacement,
    },
}

impl FrameOutcome {
    /// Placement, when the overlay was drawn
    #[must_use]
    pub fn placement(&self) -> Option<&OverlayPlacement> {
        match self {
            Self::Overlaid { placement, .. } => Some(placement),
            _ => None,
        }
    }
}

/// Draws the video frame and the transformed eyewear overlay
#[derive(Debug, Clone)]
pub struct OverlayCompositor {
    asset: OverlayAsset,
    estimator: PoseEstimator,
    width_factor: f64,
    last_rotation: Option<HeadRotation>,
    last_placement: Option<OverlayPlacement>,
    last_bounds: Option<BoundingBox>,
}

impl OverlayCompositor {
    /// Create a compositor for `asset` with the default width factor
    #[must_use]
    pub fn new(asset: OverlayAsset) -> Self {
        Self::with_width_factor(asset, DEFAULT_WIDTH_FACTOR)
    }

    /// Create a compositor with a tuned eye-distance to width ratio
    #[must_use]
    pub fn with_width_factor(asset: OverlayAsset, width_factor: f64) -> Self {
        Self {
            asset,
            estimator: PoseEstimator::new(),
            width_factor,
            last_rotation: None,
            last_placement: None,
            last_bounds: None,
        }
    }

    /// Overlay asset in use
    #[must_use]
    pub fn asset(&self) -> &OverlayAsset {
        &self.asset
    }

    /// Rotation of the last overlaid frame
    #[must_use]
    pub fn last_rotation(&self) -> Option<HeadRotation> {
        self.last_rotation
    }

    /// Placement of the last overlaid frame
    #[must_use]
    pub fn last_placement(&self) -> Option<OverlayPlacement> {
        self.last_placement
    }

    /// Pre-rotation bounding box of the last overlaid frame, for hit-testing
    #[must_use]
    pub fn last_bounds(&self) -> Option<BoundingBox> {
        self.last_bounds
    }

    /// Forget telemetry from earlier frames
    pub fn clear_telemetry(&mut self) {
        self.last_rotation = None;
        self.last_placement = None;
        self.last_bounds = None;
    }

    /// Composite one frame into `canvas`.
    ///
    /// The frame is always drawn as background. When `face` is present the
    /// overlay is drawn rotated by roll and foreshortened by yaw and pitch
    /// around the eye midpoint, at the adjustment's opacity. Failures in the
    /// landmark math never escape: the frame is reported as skipped.
    pub fn composite(
        &mut self,
        canvas: &mut Canvas,
        frame: &RgbaImage,
        face: Option<&LandmarkSet>,
        adjustment: UserAdjustment,
    ) -> FrameOutcome {
        canvas.begin_frame();
        canvas.put_frame(frame);

        let Some(landmarks) = face.filter(|set| !set.is_empty()) else {
            return FrameOutcome::NoFace;
        };

        let dims = canvas.dimensions();
        let rotation = self.estimator.estimate_rotation(landmarks, dims);
        let placement = match compute_placement(
            landmarks,
            dims,
            &rotation,
            adjustment,
            self.asset.aspect_ratio(),
            self.width_factor,
        ) {
            Ok(placement) => placement,
            Err(e) => {
                debug!("Skipping overlay for this frame: {e}");
                return FrameOutcome::Skipped;
            }
        };

        self.draw(canvas, &placement, adjustment.opacity());

        self.last_rotation = Some(rotation);
        self.last_placement = Some(placement);
        self.last_bounds = Some(placement.bounding_box());

        FrameOutcome::Overlaid { rotation, placement }
    }

    /// Draw the asset for an already computed placement
    pub fn draw(&self, canvas: &mut Canvas, placement: &OverlayPlacement, opacity: f64) {
        canvas.save();
        canvas.translate(placement.center_x, placement.center_y);
        canvas.rotate(placement.rotation_radians);
        canvas.scale(placement.x_scale_factor, placement.y_scale_factor);
        canvas.set_global_alpha(opacity);
        canvas.draw_image(
            self.asset.image(),
            -placement.width / 2.0,
            -placement.height / 2.0,
            placement.width,
            placement.height,
        );
        canvas.restore();
    }
}
