//! Frame conversions between capture-driver buffers and the output surface.

use crate::{landmarks::FrameDimensions, Error, Result};
use image::{imageops, RgbImage, RgbaImage};

/// Wrap a packed RGB24 buffer as an opaque RGBA frame
///
/// # Errors
///
/// Returns an error if the buffer length does not match `width * height * 3`.
pub fn rgb_buffer_to_rgba(buffer: Vec<u8>, width: u32, height: u32) -> Result<RgbaImage> {
    let len = buffer.len();
    let rgb = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        Error::InvalidInput(format!(
            "RGB buffer of {len} bytes does not match {width}x{height}x3"
        ))
    })?;

    Ok(image::DynamicImage::ImageRgb8(rgb).to_rgba8())
}

/// Mirror a frame horizontally in place (selfie view)
pub fn mirror_frame(frame: &mut RgbaImage) {
    imageops::flip_horizontal_in_place(frame);
}

/// Scale a frame to the surface size; frames that already match are
/// returned unchanged
#[must_use]
pub fn fit_to_dimensions(frame: &RgbaImage, dims: FrameDimensions) -> std::borrow::Cow<'_, RgbaImage> {
    if frame.dimensions() == (dims.width, dims.height) {
        std::borrow::Cow::Borrowed(frame)
    } else {
        log::debug!(
            "Resizing frame {}x{} to surface {}x{}",
            frame.width(),
            frame.height(),
            dims.width,
            dims.height
        );
        std::borrow::Cow::Owned(imageops::resize(frame, dims.width, dims.height, imageops::FilterType::Triangle))
    }
}
