use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::foundation::core::Bitmap;
use crate::foundation::error::{StickerError, StickerResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Largest accepted source dimension (width or height) in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Decode encoded image bytes into a premultiplied [`Bitmap`].
///
/// Empty input, undecodable data, zero-sized images and images larger than
/// [`MAX_DIMENSION`] on either axis are input errors.
pub fn decode_bitmap(bytes: &[u8]) -> StickerResult<Bitmap> {
    if bytes.is_empty() {
        return Err(StickerError::input("image data is empty"));
    }

    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| StickerError::input(format!("decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    if width == 0 || height == 0 {
        return Err(StickerError::input(format!(
            "image has zero dimension ({width}x{height})"
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(StickerError::input(format!(
            "image {width}x{height} exceeds maximum dimension {MAX_DIMENSION}"
        )));
    }

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Bitmap::from_premul(width, height, data)
}

/// Encode a premultiplied [`Bitmap`] as a straight-alpha RGBA PNG.
pub fn encode_png(bitmap: &Bitmap) -> StickerResult<Vec<u8>> {
    if bitmap.is_empty() {
        return Err(StickerError::export(format!(
            "cannot encode {}x{} bitmap",
            bitmap.width, bitmap.height
        )));
    }

    let mut straight = bitmap.data.clone();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = RgbaImage::from_raw(bitmap.width, bitmap.height, straight)
        .ok_or_else(|| StickerError::export("bitmap buffer does not match its dimensions"))?;

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| StickerError::export(format!("PNG encode failed: {e}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/codec.rs"]
mod tests;
