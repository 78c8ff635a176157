use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::core::{Bitmap, Rect};
use crate::foundation::error::{StickerError, StickerResult};
use crate::raster::blend::draw_over;
use crate::raster::codec::MAX_DIMENSION;
use crate::raster::surface::Surface;

/// Default clearance between the scaled image and the canvas edge.
pub const DEFAULT_PADDING: u32 = 10;

/// Fixed output size plus the clearance reserved around the drawn image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeTarget {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Minimum clearance in pixels on the constraining axis.
    pub padding: u32,
}

impl ResizeTarget {
    /// Target with the default padding.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: DEFAULT_PADDING,
        }
    }

    /// Check that the target fits [`MAX_DIMENSION`] and that the drawable area left after
    /// padding is non-empty.
    pub fn validate(&self) -> StickerResult<()> {
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(StickerError::validation(format!(
                "target {}x{} exceeds maximum dimension {MAX_DIMENSION}",
                self.width, self.height
            )));
        }
        let min = u64::from(self.padding) * 2;
        if u64::from(self.width) <= min || u64::from(self.height) <= min {
            return Err(StickerError::validation(format!(
                "target {}x{} leaves no drawable area with padding {}",
                self.width, self.height, self.padding
            )));
        }
        Ok(())
    }
}

/// Resampling filter used when the drawn size differs from the source size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Nearest neighbour.
    Nearest,
    /// Linear.
    Triangle,
    /// Cubic (Catmull-Rom).
    #[default]
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with window 3.
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(f: ResampleFilter) -> Self {
        match f {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Where and how large a source is drawn inside a [`ResizeTarget`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Uniform scale factor applied to both axes.
    pub scale: f64,
    /// Exact drawn region in canvas coordinates.
    pub drawn: Rect,
    /// Left edge of the rasterised region.
    pub pixel_x: u32,
    /// Top edge of the rasterised region.
    pub pixel_y: u32,
    /// Rasterised width (drawn width rounded, at least 1).
    pub pixel_width: u32,
    /// Rasterised height (drawn height rounded, at least 1).
    pub pixel_height: u32,
}

/// Compute the uniform scale and centered placement of a `src_w x src_h` source.
///
/// `scale = min((W - 2p) / w, (H - 2p) / h)`, drawn region centered at `((W - dw) / 2,
/// (H - dh) / 2)`.
pub fn placement(src_w: u32, src_h: u32, target: ResizeTarget) -> StickerResult<Placement> {
    if src_w == 0 || src_h == 0 {
        return Err(StickerError::input(format!(
            "cannot resize a {src_w}x{src_h} bitmap"
        )));
    }
    target.validate()?;

    let tw = f64::from(target.width);
    let th = f64::from(target.height);
    let pad2 = f64::from(target.padding) * 2.0;

    let scale = ((tw - pad2) / f64::from(src_w)).min((th - pad2) / f64::from(src_h));
    let dw = f64::from(src_w) * scale;
    let dh = f64::from(src_h) * scale;
    let x0 = (tw - dw) / 2.0;
    let y0 = (th - dh) / 2.0;

    let pixel_width = (dw.round() as u32).clamp(1, target.width);
    let pixel_height = (dh.round() as u32).clamp(1, target.height);

    Ok(Placement {
        scale,
        drawn: Rect::new(x0, y0, x0 + dw, y0 + dh),
        pixel_x: (target.width - pixel_width) / 2,
        pixel_y: (target.height - pixel_height) / 2,
        pixel_width,
        pixel_height,
    })
}

/// Scale `bitmap` uniformly into a new `target.width x target.height` bitmap, centered, with a
/// transparent background.
pub fn resize(
    bitmap: &Bitmap,
    target: ResizeTarget,
    filter: ResampleFilter,
) -> StickerResult<Bitmap> {
    let mut surface = Surface::new();
    resize_into(&mut surface, bitmap, target, filter)?;
    Ok(surface.snapshot())
}

/// Like [`resize`], drawing into a reusable surface. The surface is reset first.
pub fn resize_into(
    surface: &mut Surface,
    bitmap: &Bitmap,
    target: ResizeTarget,
    filter: ResampleFilter,
) -> StickerResult<Placement> {
    let place = placement(bitmap.width, bitmap.height, target)?;
    surface.reset(target.width, target.height)?;

    let same_size = place.pixel_width == bitmap.width && place.pixel_height == bitmap.height;
    if same_size {
        draw_over(
            surface.bitmap_mut(),
            bitmap,
            i64::from(place.pixel_x),
            i64::from(place.pixel_y),
            None,
        );
        return Ok(place);
    }

    let scaled = resample(bitmap, place.pixel_width, place.pixel_height, filter)?;
    draw_over(
        surface.bitmap_mut(),
        &scaled,
        i64::from(place.pixel_x),
        i64::from(place.pixel_y),
        None,
    );
    Ok(place)
}

fn resample(
    bitmap: &Bitmap,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> StickerResult<Bitmap> {
    let src = RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.data.clone())
        .ok_or_else(|| StickerError::input("bitmap buffer does not match its dimensions"))?;
    let resized = imageops::resize(&src, width, height, filter.into());

    // Cubic and Lanczos kernels overshoot; keep color <= alpha so the data stays premultiplied.
    let mut data = resized.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
    Bitmap::from_premul(width, height, data)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/resize.rs"]
mod tests;
