//! Utility functions for pixel-space conversions and frame handling.

pub mod safe_cast;
pub mod image_conversion;
