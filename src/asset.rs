//! Eyewear overlay image, loaded once and shared read-only by all frames.

use crate::{
    constants::{PLACEHOLDER_ASPECT_RATIO, PLACEHOLDER_WIDTH},
    utils::safe_cast::f64_to_u32_clamp,
    Error, Result,
};
use image::{Rgba, RgbaImage};
use imageproc::{
    drawing::{draw_filled_ellipse_mut, draw_filled_rect_mut},
    rect::Rect,
};
use log::{info, warn};
use std::{path::Path, sync::Arc};

const RIM_COLOR: Rgba<u8> = Rgba([20, 20, 24, 255]);
const LENS_COLOR: Rgba<u8> = Rgba([60, 80, 110, 90]);

/// Raster overlay with a fixed aspect ratio
#[derive(Debug, Clone)]
pub struct OverlayAsset {
    image: Arc<RgbaImage>,
}

impl OverlayAsset {
    /// Load an overlay image from disk (alpha channel preserved)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if the
    /// image has a zero dimension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading overlay asset: {}", path.as_ref().display());
        let image = image::open(path)?.to_rgba8();
        Self::from_image(image)
    }

    /// Load an overlay image, substituting a generated placeholder when the
    /// file is unavailable
    #[must_use]
    pub fn load_or_placeholder<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(asset) => asset,
            Err(e) => {
                warn!(
                    "Overlay asset {} unavailable ({e}), using placeholder",
                    path.as_ref().display()
                );
                Self::placeholder()
            }
        }
    }

    /// Wrap an in-memory image
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the image has a zero dimension.
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::InvalidInput(format!(
                "Overlay asset must be non-empty, got {}x{}",
                image.width(),
                image.height()
            )));
        }

        Ok(Self { image: Arc::new(image) })
    }

    /// Generated two-lens silhouette
    #[must_use]
    #[allow(clippy::cast_possible_wrap)] // Placeholder dimensions are small constants
    pub fn placeholder() -> Self {
        let width = PLACEHOLDER_WIDTH;
        let height = f64_to_u32_clamp(f64::from(width) * PLACEHOLDER_ASPECT_RATIO, 1, u32::MAX);
        let mut image = RgbaImage::new(width, height);

        let w = width as i32;
        let h = height as i32;
        let rx = w * 21 / 100;
        let ry = h * 2 / 5;
        let cy = h / 2;

        for cx in [w * 27 / 100, w * 73 / 100] {
            draw_filled_ellipse_mut(&mut image, (cx, cy), rx, ry, RIM_COLOR);
            draw_filled_ellipse_mut(&mut image, (cx, cy), rx - 8, ry - 8, LENS_COLOR);
        }

        // Bridge and temple stubs
        draw_filled_rect_mut(&mut image, Rect::at(w * 46 / 100, cy - ry / 2).of_size(width * 8 / 100, 8), RIM_COLOR);
        draw_filled_rect_mut(&mut image, Rect::at(0, cy - ry + 4).of_size(width * 6 / 100 + 1, 6), RIM_COLOR);
        draw_filled_rect_mut(
            &mut image,
            Rect::at(w - w * 6 / 100 - 1, cy - ry + 4).of_size(width * 6 / 100 + 1, 6),
            RIM_COLOR,
        );

        Self { image: Arc::new(image) }
    }

    /// Intrinsic width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Intrinsic height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Height / width
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.height()) / f64::from(self.width())
    }

    /// Pixel data
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}
