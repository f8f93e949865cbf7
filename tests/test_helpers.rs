//! Helper functions and utilities for tests

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use virtual_tryon::{
    constants::{
        landmark_index::{LEFT_EAR, LEFT_EYE_INNER, NOSE_TIP, RIGHT_EAR, RIGHT_EYE_INNER},
        MIN_FACE_MESH_LANDMARKS,
    },
    landmarks::{FrameDimensions, Landmark, LandmarkSet},
};

/// Frame size used throughout the tests
pub fn test_dims() -> FrameDimensions {
    FrameDimensions::new(640, 480)
}

/// Solid opaque frame of `dims`
pub fn solid_frame(dims: FrameDimensions, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(dims.width, dims.height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

/// Builder for synthetic face-mesh landmark sets.
///
/// Starts from a symmetric frontal face; every point not set explicitly sits
/// at the frame center.
#[derive(Debug, Clone)]
pub struct FaceBuilder {
    points: Vec<Landmark>,
}

impl FaceBuilder {
    pub fn frontal() -> Self {
        let mut points = vec![Landmark::new(0.5, 0.5); MIN_FACE_MESH_LANDMARKS];
        points[NOSE_TIP] = Landmark::with_depth(0.5, 0.5, 0.0);
        points[LEFT_EAR] = Landmark::new(0.3, 0.45);
        points[RIGHT_EAR] = Landmark::new(0.7, 0.45);
        points[LEFT_EYE_INNER] = Landmark::new(0.45, 0.42);
        points[RIGHT_EYE_INNER] = Landmark::new(0.55, 0.42);
        Self { points }
    }

    /// Place the inner eye corners at pixel positions in `dims`
    #[allow(clippy::cast_possible_truncation)]
    pub fn eyes_px(mut self, dims: FrameDimensions, left: (f64, f64), right: (f64, f64)) -> Self {
        let (w, h) = (dims.width_f64(), dims.height_f64());
        self.points[LEFT_EYE_INNER] = Landmark::new((left.0 / w) as f32, (left.1 / h) as f32);
        self.points[RIGHT_EYE_INNER] = Landmark::new((right.0 / w) as f32, (right.1 / h) as f32);
        self
    }

    pub fn nose(mut self, x: f32, y: f32, z: Option<f32>) -> Self {
        self.points[NOSE_TIP] = Landmark { x, y, z };
        self
    }

    pub fn ears(mut self, left_x: f32, right_x: f32) -> Self {
        self.points[LEFT_EAR].x = left_x;
        self.points[RIGHT_EAR].x = right_x;
        self
    }

    pub fn point(mut self, index: usize, landmark: Landmark) -> Self {
        self.points[index] = landmark;
        self
    }

    pub fn truncated(mut self, len: usize) -> Self {
        self.points.truncate(len);
        self
    }

    pub fn build(self) -> LandmarkSet {
        LandmarkSet::new(self.points)
    }
}

/// Assert two floats agree within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}
