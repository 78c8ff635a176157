//! Pixel-level building blocks: PNG/JPEG decode and PNG encode, premultiplied blending and the
//! reusable drawing surface.

/// Premultiplied RGBA8 source-over blending and clipped blits.
pub mod blend;
/// Decode to and encode from premultiplied bitmaps.
pub mod codec;
/// Reusable, explicitly cleared raster buffer.
pub mod surface;
