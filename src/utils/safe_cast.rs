//! Checked conversions between float geometry and integer pixel space

use std::ops::Range;

/// Clamp and convert f64 to u32 for pixel coordinates
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
#[allow(clippy::cast_sign_loss)] // Clamped to non-negative bounds
pub fn f64_to_u32_clamp(value: f64, min: u32, max: u32) -> u32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if value.is_nan() {
        return min;
    }

    let clamped = value.clamp(f64::from(min), f64::from(max));
    (clamped as u32).clamp(min, max)
}

/// Round a channel value to the nearest representable byte
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamped to 0..=255
#[allow(clippy::cast_sign_loss)] // Clamped to 0..=255
pub fn f64_to_u8_round(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Pixel indices touched by the continuous interval `[start, end]`,
/// clipped to `0..limit`
#[must_use]
pub fn pixel_span(start: f64, end: f64, limit: u32) -> Range<u32> {
    if !(start.is_finite() && end.is_finite()) || limit == 0 {
        return 0..0;
    }
    let (start, end) = if start <= end { (start, end) } else { (end, start) };

    let first = f64_to_u32_clamp(start.floor(), 0, limit);
    let last = f64_to_u32_clamp(end.ceil(), 0, limit);
    first..last
}
