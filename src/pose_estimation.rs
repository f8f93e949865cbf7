use crate::{
    constants::{
        landmark_index::{LEFT_EAR, LEFT_EYE_INNER, NOSE_TIP, RIGHT_EAR, RIGHT_EYE_INNER},
        PITCH_DEPTH_NORMALIZER, PITCH_GAIN, PITCH_LIMIT_DEG, ROLL_LIMIT_DEG, YAW_LIMIT_DEG,
    },
    landmarks::{FrameDimensions, LandmarkSet},
    Error, Result,
};

/// Approximate head orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadRotation {
    /// Up/down nod, positive when the nose tip sits in front of the eye plane
    pub pitch: f64,
    /// Left/right turn
    pub yaw: f64,
    /// In-plane tilt
    pub roll: f64,
}

impl HeadRotation {
    /// Frontal, untilted head
    pub const NEUTRAL: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    /// Build a rotation with each angle clamped to its plausible range
    #[must_use]
    pub fn clamped(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self {
            pitch: pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            yaw: yaw.clamp(-YAW_LIMIT_DEG, YAW_LIMIT_DEG),
            roll: roll.clamp(-ROLL_LIMIT_DEG, ROLL_LIMIT_DEG),
        }
    }

    /// True when all three angles are exactly zero
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

/// Head rotation estimator working from 2D/2.5D face-mesh landmarks.
///
/// This is a cheap screen-space heuristic, not a `PnP` solve: yaw comes
/// from the nose's offset between the ears, roll from the slope of the
/// eye-corner line and pitch from the nose tip's relative depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseEstimator;

impl PoseEstimator {
    /// Create a new pose estimator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Estimate head rotation, falling back to [`HeadRotation::NEUTRAL`]
    /// when the landmark set cannot be evaluated.
    #[must_use]
    pub fn estimate_rotation(&self, landmarks: &LandmarkSet, dims: FrameDimensions) -> HeadRotation {
        match self.try_estimate_rotation(landmarks, dims) {
            Ok(rotation) => rotation,
            Err(e) => {
                log::debug!("Substituting neutral rotation: {e}");
                HeadRotation::NEUTRAL
            }
        }
    }

    /// Estimate head rotation
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The frame has a zero dimension
    /// - A required landmark is missing or non-finite
    /// - Any intermediate angle is not a finite number
    pub fn try_estimate_rotation(&self, landmarks: &LandmarkSet, dims: FrameDimensions) -> Result<HeadRotation> {
        if dims.width == 0 || dims.height == 0 {
            return Err(Error::InvalidInput(format!(
                "Frame dimensions must be non-zero, got {}x{}",
                dims.width, dims.height
            )));
        }
        let width = dims.width_f64();

        let nose = landmarks.landmark(NOSE_TIP)?;
        let left_eye = landmarks.landmark(LEFT_EYE_INNER)?;
        let right_eye = landmarks.landmark(RIGHT_EYE_INNER)?;

        let nose_x = f64::from(nose.x) * width;
        let left_ear_x = landmarks.pixel_x(LEFT_EAR, dims)?;
        let right_ear_x = landmarks.pixel_x(RIGHT_EAR, dims)?;
        let left_eye_x = f64::from(left_eye.x) * width;
        let right_eye_x = f64::from(right_eye.x) * width;

        let eye_width = (right_eye_x - left_eye_x).abs();

        let ear_to_nose_left = nose_x - left_ear_x;
        let ear_to_nose_right = right_ear_x - nose_x;
        let yaw = (ear_to_nose_left - ear_to_nose_right).atan2(eye_width).to_degrees();

        let roll = (f64::from(right_eye.y) - f64::from(left_eye.y))
            .atan2((right_eye_x - left_eye_x) / width)
            .to_degrees();

        let depth = f64::from(nose.z.unwrap_or(0.0));
        let pitch = depth.atan2((eye_width / PITCH_DEPTH_NORMALIZER).max(1.0)).to_degrees() * PITCH_GAIN;

        if !(pitch.is_finite() && yaw.is_finite() && roll.is_finite()) {
            return Err(Error::MalformedLandmarks(format!(
                "non-finite rotation (pitch {pitch}, yaw {yaw}, roll {roll})"
            )));
        }

        Ok(HeadRotation::clamped(pitch, yaw, roll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::MIN_FACE_MESH_LANDMARKS, landmarks::Landmark};

    fn face(nose: (f32, f32, f32), ears: (f32, f32), left_eye: (f32, f32), right_eye: (f32, f32)) -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5); MIN_FACE_MESH_LANDMARKS];
        points[NOSE_TIP] = Landmark::with_depth(nose.0, nose.1, nose.2);
        points[LEFT_EAR] = Landmark::new(ears.0, 0.45);
        points[RIGHT_EAR] = Landmark::new(ears.1, 0.45);
        points[LEFT_EYE_INNER] = Landmark::new(left_eye.0, left_eye.1);
        points[RIGHT_EYE_INNER] = Landmark::new(right_eye.0, right_eye.1);
        LandmarkSet::new(points)
    }

    fn dims() -> FrameDimensions {
        FrameDimensions::new(640, 480)
    }

    #[test]
    fn test_frontal_face_is_neutral() {
        let set = face((0.5, 0.55, 0.0), (0.25, 0.75), (0.4375, 0.4), (0.5625, 0.4));
        let rotation = PoseEstimator::new().estimate_rotation(&set, dims());

        assert!(rotation.pitch.abs() < 1e-6);
        assert!(rotation.yaw.abs() < 1e-6);
        assert!(rotation.roll.abs() < 1e-6);
    }

    #[test]
    fn test_yaw_follows_nose_offset() {
        // Nose shifted towards the right ear
        let set = face((0.55, 0.55, 0.0), (0.25, 0.75), (0.4375, 0.4), (0.5625, 0.4));
        let rotation = PoseEstimator::new().estimate_rotation(&set, dims());
        assert!(rotation.yaw > 0.0);

        let set = face((0.45, 0.55, 0.0), (0.25, 0.75), (0.4375, 0.4), (0.5625, 0.4));
        let rotation = PoseEstimator::new().estimate_rotation(&set, dims());
        assert!(rotation.yaw < 0.0);
    }

    #[test]
    fn test_extreme_yaw_is_clamped() {
        // Ears far apart on one side, eyes nearly coincident
        let set = face((0.9, 0.55, 0.0), (0.0, 0.95), (0.5, 0.4), (0.5001, 0.4));
        let rotation = PoseEstimator::new().estimate_rotation(&set, dims());
        assert_eq!(rotation.yaw, YAW_LIMIT_DEG);
    }

    #[test]
    fn test_roll_from_eye_slope() {
        let set = face((0.5, 0.55, 0.0), (0.25, 0.75), (0.4, 0.40), (0.6, 0.42));
        let rotation = PoseEstimator::new().estimate_rotation(&set, dims());

        let expected = (0.02f32 as f64).atan2(0.2).to_degrees();
        assert!(rotation.roll > 0.0);
        assert!((rotation.roll - expected).abs() < 0.05);
    }

    #[test]
    fn test_pitch_from_nose_depth() {
        // eye width = 80 px -> normaliser max(1, 1.6) = 1.6
        let set = face((0.5, 0.55, 0.1), (0.25, 0.75), (0.4375, 0.4), (0.5625, 0.4));
        let rotation = PoseEstimator::new().estimate_rotation(&set, dims());

        let expected = 0.1f64.atan2(1.6).to_degrees() * 2.0;
        assert!((rotation.pitch - expected).abs() < 1e-3);

        // Large depth saturates at the clamp
        let set = face((0.5, 0.55, 50.0), (0.25, 0.75), (0.4375, 0.4), (0.5625, 0.4));
        let rotation = PoseEstimator::new().estimate_rotation(&set, dims());
        assert_eq!(rotation.pitch, PITCH_LIMIT_DEG);
    }

    #[test]
    fn test_missing_depth_defaults_to_zero_pitch() {
        let mut set = face((0.5, 0.55, 0.0), (0.25, 0.75), (0.4375, 0.4), (0.5625, 0.4));
        let mut points = set.points().to_vec();
        points[NOSE_TIP] = Landmark::new(0.5, 0.55);
        set = LandmarkSet::new(points);

        let rotation = PoseEstimator::new().estimate_rotation(&set, dims());
        assert_eq!(rotation.pitch, 0.0);
    }

    #[test]
    fn test_fail_soft_on_malformed_input() {
        let estimator = PoseEstimator::new();

        let short = LandmarkSet::new(vec![Landmark::new(0.5, 0.5); 100]);
        assert!(estimator.estimate_rotation(&short, dims()).is_neutral());
        assert!(estimator.try_estimate_rotation(&short, dims()).is_err());

        let mut points = face((0.5, 0.55, 0.0), (0.25, 0.75), (0.4, 0.4), (0.6, 0.45)).points().to_vec();
        points[RIGHT_EAR] = Landmark::new(f32::NAN, 0.5);
        let nan_set = LandmarkSet::new(points);
        assert!(estimator.estimate_rotation(&nan_set, dims()).is_neutral());

        assert!(estimator.estimate_rotation(&LandmarkSet::default(), dims()).is_neutral());
    }

    #[test]
    fn test_zero_dimensions_are_neutral() {
        let set = face((0.55, 0.55, 0.2), (0.25, 0.75), (0.4, 0.4), (0.6, 0.45));
        let estimator = PoseEstimator::new();

        assert!(estimator.estimate_rotation(&set, FrameDimensions::new(0, 480)).is_neutral());
        assert!(matches!(
            estimator.try_estimate_rotation(&set, FrameDimensions::new(640, 0)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_clamped_constructor() {
        let rotation = HeadRotation::clamped(-90.0, 200.0, 45.0);
        assert_eq!(rotation.pitch, -PITCH_LIMIT_DEG);
        assert_eq!(rotation.yaw, YAW_LIMIT_DEG);
        assert_eq!(rotation.roll, ROLL_LIMIT_DEG);
    }
}
