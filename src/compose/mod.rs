//! Bitmap composition stages: outline synthesis and spec-driven scale/center resizing.

/// Uniform scale-and-center into a fixed canvas.
pub mod resize;
/// Radial offset outline ("stroke") synthesis.
pub mod stroke;
