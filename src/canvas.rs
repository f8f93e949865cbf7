//! Output raster surface with a 2D drawing-state stack.
//!
//! Mirrors the small subset of an immediate-mode 2D context the overlay
//! needs: `save`/`restore` of an affine transform plus global alpha,
//! `translate`/`rotate`/`scale` composed in local space, and `draw_image`
//! with bilinear sampling and source-over blending.

use crate::{
    landmarks::FrameDimensions,
    utils::{
        image_conversion::fit_to_dimensions,
        safe_cast::{f64_to_u8_round, pixel_span},
    },
};
use image::{Rgba, RgbaImage};
use nalgebra::{Matrix3, Point2};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawState {
    transform: Matrix3<f64>,
    global_alpha: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Matrix3::identity(),
            global_alpha: 1.0,
        }
    }
}

/// Raster surface the composited frame is drawn into
#[derive(Debug, Clone)]
pub struct Canvas {
    surface: RgbaImage,
    state: DrawState,
    saved: Vec<DrawState>,
    image_draws: usize,
}

impl Canvas {
    /// Create a transparent surface
    #[must_use]
    pub fn new(dims: FrameDimensions) -> Self {
        Self {
            surface: RgbaImage::new(dims.width, dims.height),
            state: DrawState::default(),
            saved: Vec::new(),
            image_draws: 0,
        }
    }

    /// Surface size
    #[must_use]
    pub fn dimensions(&self) -> FrameDimensions {
        FrameDimensions::new(self.surface.width(), self.surface.height())
    }

    /// Current pixels
    #[must_use]
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Take the pixels, consuming the canvas
    #[must_use]
    pub fn into_surface(self) -> RgbaImage {
        self.surface
    }

    /// Start a new frame: drop saved states, reset the transform, alpha and
    /// draw counter, and clear the surface to transparent
    pub fn begin_frame(&mut self) {
        self.saved.clear();
        self.state = DrawState::default();
        self.image_draws = 0;
        self.surface.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
    }

    /// Copy a video frame onto the whole surface, scaled to fit.
    ///
    /// Ignores the current transform and alpha; does not count as an image draw.
    pub fn put_frame(&mut self, frame: &RgbaImage) {
        let fitted = fit_to_dimensions(frame, self.dimensions());
        self.surface = fitted.into_owned();
    }

    /// Push the current transform and alpha
    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    /// Pop the last saved transform and alpha; no-op on an empty stack
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Number of saved states
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Move the local origin
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.state.transform *= Matrix3::new(1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0);
    }

    /// Rotate local axes clockwise on screen (y points down)
    pub fn rotate(&mut self, radians: f64) {
        let (sin, cos) = radians.sin_cos();
        self.state.transform *= Matrix3::new(cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0);
    }

    /// Scale local axes
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform *= Matrix3::new(sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0);
    }

    /// Current local-to-surface transform
    #[must_use]
    pub fn transform(&self) -> Matrix3<f64> {
        self.state.transform
    }

    /// Set opacity for subsequent image draws; values outside `[0, 1]` are ignored
    pub fn set_global_alpha(&mut self, alpha: f64) {
        if (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    /// Opacity applied to image draws
    #[must_use]
    pub fn global_alpha(&self) -> f64 {
        self.state.global_alpha
    }

    /// Image draws since the last `begin_frame`
    #[must_use]
    pub fn image_draws(&self) -> usize {
        self.image_draws
    }

    /// Draw `image` stretched over the local rectangle `(x, y, width, height)`
    pub fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64, width: f64, height: f64) {
        self.image_draws += 1;

        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 || self.state.global_alpha <= 0.0 {
            return;
        }
        let (iw, ih) = (f64::from(iw), f64::from(ih));

        let image_to_local = Matrix3::new(width / iw, 0.0, x, 0.0, height / ih, y, 0.0, 0.0, 1.0);
        let image_to_surface = self.state.transform * image_to_local;
        let Some(surface_to_image) = image_to_surface.try_inverse() else {
            return;
        };

        let corners = [(0.0, 0.0), (iw, 0.0), (0.0, ih), (iw, ih)]
            .map(|(u, v)| image_to_surface.transform_point(&Point2::new(u, v)));
        let (min_x, max_x) = corners
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
        let (min_y, max_y) = corners
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

        let alpha = self.state.global_alpha;
        for py in pixel_span(min_y, max_y, self.surface.height()) {
            for px in pixel_span(min_x, max_x, self.surface.width()) {
                let src = surface_to_image.transform_point(&Point2::new(f64::from(px) + 0.5, f64::from(py) + 0.5));
                if !(src.x >= 0.0 && src.x < iw && src.y >= 0.0 && src.y < ih) {
                    continue;
                }

                let sample = sample_bilinear(image, src.x - 0.5, src.y - 0.5);
                let src_alpha = sample[3] / 255.0 * alpha;
                if src_alpha <= 0.0 {
                    continue;
                }

                let dst = self.surface.get_pixel_mut(px, py);
                blend_over(dst, sample, src_alpha);
            }
        }
    }
}

/// Bilinear sample with edge clamping; returns straight-alpha RGBA in 0..=255
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> [f64; 4] {
    let max_x = f64::from(image.width() - 1);
    let max_y = f64::from(image.height() - 1);
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x1 = (x0 + 1.0).min(max_x);
    let y1 = (y0 + 1.0).min(max_y);

    // Interpolate premultiplied so transparent texels carry no color
    let mut acc = [0.0f64; 4];
    for (sx, sy, weight) in [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x1, y0, fx * (1.0 - fy)),
        (x0, y1, (1.0 - fx) * fy),
        (x1, y1, fx * fy),
    ] {
        if weight == 0.0 {
            continue;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped above
        let texel = image.get_pixel(sx as u32, sy as u32);
        let a = f64::from(texel[3]) / 255.0;
        for c in 0..3 {
            acc[c] += f64::from(texel[c]) * a * weight;
        }
        acc[3] += f64::from(texel[3]) * weight;
    }

    if acc[3] > 0.0 {
        let a = acc[3] / 255.0;
        for value in acc.iter_mut().take(3) {
            *value /= a;
        }
    }
    acc
}

/// Source-over composite of a straight-alpha color onto `dst`
fn blend_over(dst: &mut Rgba<u8>, src: [f64; 4], src_alpha: f64) {
    let dst_alpha = f64::from(dst[3]) / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return;
    }

    for c in 0..3 {
        let value = (src[c] * src_alpha + f64::from(dst[c]) * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        dst[c] = f64_to_u8_round(value);
    }
    dst[3] = f64_to_u8_round(out_alpha * 255.0);
}
