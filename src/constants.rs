//! Constants used throughout the crate

/// Minimum number of points in a full face-mesh topology
pub const MIN_FACE_MESH_LANDMARKS: usize = 468;

/// Landmark index contract of the face-mesh topology.
///
/// Mouth corners (78, 308) belong to the contract but no estimate reads them.
pub mod landmark_index {
    /// Nose tip
    pub const NOSE_TIP: usize = 0;
    /// Left eye inner corner
    pub const LEFT_EYE_INNER: usize = 33;
    /// Right eye inner corner
    pub const RIGHT_EYE_INNER: usize = 263;
    /// Left ear region (tragus)
    pub const LEFT_EAR: usize = 234;
    /// Right ear region (tragus)
    pub const RIGHT_EAR: usize = 454;
    /// Mouth left corner
    pub const MOUTH_LEFT: usize = 78;
    /// Mouth right corner
    pub const MOUTH_RIGHT: usize = 308;
}

/// Pitch clamp range in degrees
pub const PITCH_LIMIT_DEG: f64 = 30.0;

/// Yaw clamp range in degrees
pub const YAW_LIMIT_DEG: f64 = 40.0;

/// Roll clamp range in degrees
pub const ROLL_LIMIT_DEG: f64 = 30.0;

/// Inter-eye width divisor used to normalise nose depth for pitch
pub const PITCH_DEPTH_NORMALIZER: f64 = 50.0;

/// Pitch gain applied after the depth angle is computed
pub const PITCH_GAIN: f64 = 2.0;

/// Empirical ratio between eyewear width and inner eye-corner distance
pub const DEFAULT_WIDTH_FACTOR: f64 = 2.2;

/// User size slider bounds (percent)
pub const SIZE_PERCENT_MIN: u32 = 70;
pub const SIZE_PERCENT_MAX: u32 = 140;

/// User transparency slider bounds (percent)
pub const ALPHA_PERCENT_MIN: u32 = 30;
pub const ALPHA_PERCENT_MAX: u32 = 100;

/// Default output surface size
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Aspect ratio (height / width) of the generated placeholder asset
pub const PLACEHOLDER_ASPECT_RATIO: f64 = 0.4;

/// Default placeholder asset width in pixels
pub const PLACEHOLDER_WIDTH: u32 = 400;

/// File name used by `capture` when none is configured
pub const DEFAULT_CAPTURE_FILE_NAME: &str = "tryon-with-glasses.png";
