use std::f64::consts::TAU;

use crate::foundation::core::{Bitmap, Rgba8, Vec2};
use crate::foundation::error::{StickerError, StickerResult};
use crate::raster::blend::draw_over;
use crate::raster::codec::MAX_DIMENSION;

/// Canvas margin added on every side to hold the outline.
pub const STROKE_MARGIN: u32 = 20;
/// Default outline width in pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 5.0;
/// Default number of radial offset samples.
pub const DEFAULT_STROKE_STEPS: u32 = 8;

/// Outline parameters.
///
/// The outline is sampled along `steps` evenly spaced directions. With the defaults (8 steps,
/// width 5) thin gaps can remain between neighbouring directions at sharp concavities.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrokeOpts {
    /// Outline width in pixels.
    pub width: f64,
    /// Number of radial offset composites.
    pub steps: u32,
    /// Outline color.
    pub color: Rgba8,
    /// Transparent margin added around the source on every side.
    pub margin: u32,
}

impl Default for StrokeOpts {
    fn default() -> Self {
        Self {
            width: DEFAULT_STROKE_WIDTH,
            steps: DEFAULT_STROKE_STEPS,
            color: Rgba8::WHITE,
            margin: STROKE_MARGIN,
        }
    }
}

impl StrokeOpts {
    /// Reject option combinations that cannot produce an outline inside the margin.
    pub fn validate(&self) -> StickerResult<()> {
        if self.steps == 0 {
            return Err(StickerError::validation("stroke steps must be > 0"));
        }
        if self.margin > MAX_DIMENSION {
            return Err(StickerError::validation(format!(
                "stroke margin {} exceeds maximum {MAX_DIMENSION}",
                self.margin
            )));
        }
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(StickerError::validation(format!(
                "stroke width must be a finite non-negative number, got {}",
                self.width
            )));
        }
        if self.width > f64::from(self.margin) {
            return Err(StickerError::validation(format!(
                "stroke width {} does not fit in margin {}",
                self.width, self.margin
            )));
        }
        Ok(())
    }

    /// Whole-pixel offsets of every radial composite, in drawing order.
    ///
    /// Step `i` uses angle `2πi / steps` and offset `width · (cos θ, sin θ)`, rounded to the
    /// nearest pixel.
    pub fn offsets(&self) -> Vec<(i64, i64)> {
        (0..self.steps)
            .map(|i| {
                let theta = TAU * f64::from(i) / f64::from(self.steps);
                let d = (Vec2::from_angle(theta) * self.width).round();
                (d.x as i64, d.y as i64)
            })
            .collect()
    }
}

/// Draw a solid outline behind the foreground of `bitmap`.
///
/// Returns a new bitmap of `(width + 2·margin) x (height + 2·margin)`: the source is placed at
/// `(margin, margin)`, tinted copies are composited at every radial offset and the untouched
/// source is composited on top.
pub fn compose_stroke(bitmap: &Bitmap, opts: &StrokeOpts) -> StickerResult<Bitmap> {
    opts.validate()?;
    if bitmap.is_empty() {
        return Err(StickerError::input(format!(
            "cannot stroke a {}x{} bitmap",
            bitmap.width, bitmap.height
        )));
    }

    let grow = |v: u32| {
        opts.margin
            .checked_mul(2)
            .and_then(|m| v.checked_add(m))
            .ok_or_else(|| StickerError::validation("stroke canvas size overflows"))
    };
    let width = grow(bitmap.width)?;
    let height = grow(bitmap.height)?;
    let margin = i64::from(opts.margin);

    let mut scratch = Bitmap::new(width, height)?;
    draw_over(&mut scratch, bitmap, margin, margin, None);

    let mut out = Bitmap::new(width, height)?;
    for (dx, dy) in opts.offsets() {
        draw_over(&mut out, &scratch, dx, dy, Some(opts.color));
    }
    draw_over(&mut out, &scratch, 0, 0, None);

    tracing::debug!(
        src_w = bitmap.width,
        src_h = bitmap.height,
        width,
        height,
        steps = opts.steps,
        "stroke composed"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/stroke.rs"]
mod tests;
