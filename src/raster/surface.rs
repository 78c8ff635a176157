use crate::foundation::core::{Bitmap, byte_len};
use crate::foundation::error::StickerResult;

/// Counters describing how a [`Surface`] has been used.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Number of `reset` calls.
    pub resets: u64,
    /// Resets that had to grow the backing allocation.
    pub grows: u64,
    /// Largest byte length the surface has held.
    pub peak_bytes: usize,
}

/// A reusable drawing surface.
///
/// The backing buffer is kept across renders. Every render must start with [`Surface::reset`],
/// which assigns the new dimensions and clears all pixels; nothing drawn for a previous target
/// survives a reset.
#[derive(Debug)]
pub struct Surface {
    bitmap: Bitmap,
    stats: SurfaceStats,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Create an empty 0x0 surface.
    pub fn new() -> Self {
        Self {
            bitmap: Bitmap {
                width: 0,
                height: 0,
                data: Vec::new(),
            },
            stats: SurfaceStats::default(),
        }
    }

    /// Resize to `width x height` and clear every pixel to transparent.
    pub fn reset(&mut self, width: u32, height: u32) -> StickerResult<()> {
        let len = byte_len(width, height)?;
        if len > self.bitmap.data.capacity() {
            self.stats.grows = self.stats.grows.saturating_add(1);
        }

        self.bitmap.data.clear();
        self.bitmap.data.resize(len, 0);
        self.bitmap.width = width;
        self.bitmap.height = height;

        self.stats.resets = self.stats.resets.saturating_add(1);
        self.stats.peak_bytes = self.stats.peak_bytes.max(len);
        Ok(())
    }

    /// Current width in pixels.
    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    /// Current height in pixels.
    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    /// Borrow the current pixels.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Mutably borrow the current pixels for drawing.
    pub fn bitmap_mut(&mut self) -> &mut Bitmap {
        &mut self.bitmap
    }

    /// Copy the current pixels out into an owned bitmap.
    pub fn snapshot(&self) -> Bitmap {
        self.bitmap.clone()
    }

    /// Usage counters.
    pub fn stats(&self) -> SurfaceStats {
        self.stats.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
